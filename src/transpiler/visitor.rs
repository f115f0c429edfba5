use super::ast::*;

/// A borrowed view of any node in an ABI tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Function(&'a FunctionEntry),
    Constructor(&'a ConstructorEntry),
    Fallback(&'a FallbackEntry),
    Receive(&'a ReceiveEntry),
    Event(&'a EventEntry),
    Error(&'a ErrorEntry),
    Parameter(&'a Parameter),
}

impl<'a> From<&'a AbiEntry> for Node<'a> {
    fn from(entry: &'a AbiEntry) -> Self {
        match entry {
            AbiEntry::Function(entry) => Node::Function(entry),
            AbiEntry::Constructor(entry) => Node::Constructor(entry),
            AbiEntry::Fallback(entry) => Node::Fallback(entry),
            AbiEntry::Receive(entry) => Node::Receive(entry),
            AbiEntry::Event(entry) => Node::Event(entry),
            AbiEntry::Error(entry) => Node::Error(entry),
        }
    }
}

impl<'a> From<&'a Parameter> for Node<'a> {
    fn from(parameter: &'a Parameter) -> Self {
        Node::Parameter(parameter)
    }
}

/// One handler per node kind. `Context` is whatever the caller threads down
/// to its children, e.g. which construct owns a parameter.
pub trait Visitor<'a> {
    type Output;
    type Context;

    fn visit_function(
        &mut self,
        entry: &'a FunctionEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_constructor(
        &mut self,
        entry: &'a ConstructorEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_fallback(
        &mut self,
        entry: &'a FallbackEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_receive(
        &mut self,
        entry: &'a ReceiveEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_event(
        &mut self,
        entry: &'a EventEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_error(
        &mut self,
        entry: &'a ErrorEntry,
        context: Option<Self::Context>,
    ) -> Self::Output;
    fn visit_parameter(
        &mut self,
        parameter: &'a Parameter,
        context: Option<Self::Context>,
    ) -> Self::Output;
}

pub fn dispatch<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: Node<'a>,
    context: Option<V::Context>,
) -> V::Output {
    match node {
        Node::Function(entry) => visitor.visit_function(entry, context),
        Node::Constructor(entry) => visitor.visit_constructor(entry, context),
        Node::Fallback(entry) => visitor.visit_fallback(entry, context),
        Node::Receive(entry) => visitor.visit_receive(entry, context),
        Node::Event(entry) => visitor.visit_event(entry, context),
        Node::Error(entry) => visitor.visit_error(entry, context),
        Node::Parameter(parameter) => visitor.visit_parameter(parameter, context),
    }
}
