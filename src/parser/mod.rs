use pest::Parser;
use pest_derive::Parser;
use anyhow::{Result, Context, anyhow};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use crate::transpiler::ast::{Abi, AbiEntry};

#[derive(Parser)]
#[grammar = "parser/abi_type.pest"]
pub struct AbiTypeParser;

/// Parses an ABI document. Accepts a bare array of entries or a compiler
/// artifact with an `abi` field.
pub fn parse_abi(source: &str) -> Result<Abi> {
    let document: Value = serde_json::from_str(source)
        .with_context(|| "Failed to parse ABI JSON")?;

    let entries = match document {
        entries @ Value::Array(_) => entries,
        Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| anyhow!("Artifact object has no `abi` field"))?,
        _ => return Err(anyhow!("ABI must be a JSON array or an artifact object")),
    };

    let abi: Vec<AbiEntry> = serde_json::from_value(entries.clone())
        .with_context(|| "ABI does not match the entry grammar")?;
    debug!("parsed {} ABI entries", abi.len());
    Ok(Abi {
        entries: abi,
        json: entries,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Tuple,
    Elementary(String),
}

/// A parameter type string split into its base and array dimensions.
/// `None` dimensions are dynamic (`[]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub base: BaseType,
    pub dimensions: Vec<Option<usize>>,
}

impl TypeName {
    pub fn parse(text: &str) -> Result<TypeName> {
        let pair = AbiTypeParser::parse(Rule::abi_type, text)
            .with_context(|| format!("Invalid ABI type `{}`", text))?
            .next()
            .ok_or_else(|| anyhow!("Empty ABI type"))?;

        let mut base = None;
        let mut dimensions = Vec::new();
        for token in pair.into_inner() {
            match token.as_rule() {
                Rule::tuple_marker => base = Some(BaseType::Tuple),
                Rule::elementary => {
                    base = Some(BaseType::Elementary(token.as_str().to_string()));
                }
                Rule::array_suffix => {
                    let length = token
                        .into_inner()
                        .next()
                        .map(|length| length.as_str().parse::<usize>())
                        .transpose()
                        .with_context(|| format!("Array length too large in `{}`", text))?;
                    dimensions.push(length);
                }
                _ => {}
            }
        }

        Ok(TypeName {
            base: base.ok_or_else(|| anyhow!("Missing base type in `{}`", text))?,
            dimensions,
        })
    }

    /// Whether the type is passed by reference and needs a data location.
    pub fn is_reference(&self) -> bool {
        if !self.dimensions.is_empty() {
            return true;
        }
        match &self.base {
            BaseType::Tuple => true,
            BaseType::Elementary(name) => name == "bytes" || name == "string",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            BaseType::Tuple => write!(f, "tuple")?,
            BaseType::Elementary(name) => write!(f, "{}", name)?,
        }
        for dimension in &self.dimensions {
            match dimension {
                Some(length) => write!(f, "[{}]", length)?,
                None => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
