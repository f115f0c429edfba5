use super::ast::*;
use super::visitor::{dispatch, Visitor};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Canonical key for the shape of a tuple: its component types in order,
/// with nested tuples replaced by their own signature. Names never
/// contribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn of(components: &[Parameter]) -> Signature {
        let types: Vec<String> = components
            .iter()
            .map(|component| match &component.components {
                Some(inner) => format!("{}{}", Signature::of(inner), component.array_suffix()),
                None => component.param_type.clone(),
            })
            .collect();
        Signature(format!("({})", types.join(",")))
    }

    /// Signature of a structured parameter, `None` for elementary ones.
    pub fn of_parameter(parameter: &Parameter) -> Option<Signature> {
        parameter.components.as_deref().map(Signature::of)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationField {
    pub name: String,
    pub param_type: String,
    /// Set when the field is itself a tuple.
    pub signature: Option<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub identifier: String,
    pub fields: Vec<DeclarationField>,
}

/// Struct declarations keyed by signature, in discovery order.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    entries: IndexMap<Signature, Declaration>,
}

impl DeclarationTable {
    pub fn get(&self, signature: &Signature) -> Option<&Declaration> {
        self.entries.get(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &Declaration)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn collect_declarations(abi: &[AbiEntry]) -> DeclarationTable {
    collect_declarations_reserving(abi, &[])
}

/// Like `collect_declarations`, but never hands out any of `reserved` as a
/// struct name, e.g. the name of the interface being generated.
pub fn collect_declarations_reserving(abi: &[AbiEntry], reserved: &[&str]) -> DeclarationTable {
    let mut collector = Collector {
        taken: reserved.iter().map(|name| name.to_string()).collect(),
        ..Collector::default()
    };
    for entry in abi {
        dispatch(&mut collector, entry.into(), None);
    }
    let table = DeclarationTable {
        entries: collector.table,
    };
    debug!("collected {} struct declarations", table.len());
    table
}

#[derive(Default)]
struct Collector {
    table: IndexMap<Signature, Declaration>,
    taken: HashSet<String>,
    counter: usize,
}

impl Collector {
    fn visit_all(&mut self, parameters: &[Parameter]) {
        for parameter in parameters {
            dispatch(self, parameter.into(), None);
        }
    }

    fn declare(&mut self, parameter: &Parameter, components: &[Parameter]) {
        let signature = Signature::of(components);
        if self.table.contains_key(&signature) {
            return;
        }

        let identifier = match infer_name(parameter) {
            Some(name) if !self.taken.contains(&name) => name,
            _ => self.next_synthetic(),
        };
        debug!("declaring struct {} for {}", identifier, signature);
        self.taken.insert(identifier.clone());

        let fields = components
            .iter()
            .map(|component| DeclarationField {
                name: component.name.clone(),
                param_type: component.param_type.clone(),
                signature: Signature::of_parameter(component),
            })
            .collect();
        self.table.insert(signature, Declaration { identifier, fields });
    }

    fn next_synthetic(&mut self) -> String {
        loop {
            let candidate = format!("S_{}", self.counter);
            self.counter += 1;
            if !self.taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl<'a> Visitor<'a> for Collector {
    type Output = ();
    type Context = ();

    fn visit_function(&mut self, entry: &'a FunctionEntry, _: Option<()>) {
        self.visit_all(&entry.inputs);
        self.visit_all(&entry.outputs);
    }

    fn visit_constructor(&mut self, entry: &'a ConstructorEntry, _: Option<()>) {
        self.visit_all(&entry.inputs);
    }

    fn visit_fallback(&mut self, _: &'a FallbackEntry, _: Option<()>) {}

    fn visit_receive(&mut self, _: &'a ReceiveEntry, _: Option<()>) {}

    fn visit_event(&mut self, entry: &'a EventEntry, _: Option<()>) {
        self.visit_all(&entry.inputs);
    }

    fn visit_error(&mut self, entry: &'a ErrorEntry, _: Option<()>) {
        self.visit_all(&entry.inputs);
    }

    fn visit_parameter(&mut self, parameter: &'a Parameter, _: Option<()>) {
        if let Some(components) = &parameter.components {
            // inner tuples are declared before the tuple that holds them
            self.visit_all(components);
            self.declare(parameter, components);
        }
    }
}

/// `struct Lib.Order[]` -> `Order`
fn infer_name(parameter: &Parameter) -> Option<String> {
    let internal_type = parameter.internal_type.as_deref()?;
    let qualified = internal_type.strip_prefix("struct ")?;
    let qualified = qualified.split('[').next().unwrap_or(qualified);
    let name = qualified.rsplit('.').next().unwrap_or(qualified);
    is_identifier(name).then(|| name.to_string())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
