use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;

/// A parsed ABI together with the JSON it was read from. The JSON keeps
/// fields the entry model ignores (`gas`, `signature`, ...) and their order.
#[derive(Debug, Clone, PartialEq)]
pub struct Abi {
    pub entries: Vec<AbiEntry>,
    pub json: Value,
}

impl Deref for Abi {
    type Target = [AbiEntry];

    fn deref(&self) -> &[AbiEntry] {
        &self.entries
    }
}

/// One entry of a contract ABI, discriminated by its `type` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    Function(FunctionEntry),
    Constructor(ConstructorEntry),
    Fallback(FallbackEntry),
    Receive(ReceiveEntry),
    Event(EventEntry),
    Error(ErrorEntry),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl StateMutability {
    /// Keyword emitted after `external`, `None` for the default.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            StateMutability::Pure => Some("pure"),
            StateMutability::View => Some("view"),
            StateMutability::Nonpayable => None,
            StateMutability::Payable => Some("payable"),
        }
    }
}

/// Mutability fields shared by every callable entry. Old compilers emit
/// `constant`/`payable` flags instead of `stateMutability`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mutability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
}

impl Mutability {
    pub fn effective(&self) -> StateMutability {
        if let Some(mutability) = self.state_mutability {
            return mutability;
        }
        if self.constant == Some(true) {
            StateMutability::View
        } else if self.payable == Some(true) {
            StateMutability::Payable
        } else {
            StateMutability::Nonpayable
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<Parameter>,
    #[serde(flatten)]
    pub mutability: Mutability,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConstructorEntry {
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(flatten)]
    pub mutability: Mutability,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FallbackEntry {
    #[serde(flatten)]
    pub mutability: Mutability,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceiveEntry {
    #[serde(flatten)]
    pub mutability: Mutability,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
}

/// A typed parameter. Structured parameters (`tuple`, `tuple[]`, ...) carry
/// their members in `components`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

impl Parameter {
    pub fn is_structured(&self) -> bool {
        self.components.is_some()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed.unwrap_or(false)
    }

    pub fn array_suffix(&self) -> &str {
        array_suffix(&self.param_type)
    }
}

/// Array dimensions written after the base type, e.g. `[2][]` for
/// `tuple[2][]`.
pub fn array_suffix(param_type: &str) -> &str {
    match param_type.find('[') {
        Some(start) => &param_type[start..],
        None => "",
    }
}
