pub mod formatter;

use crate::parser::TypeName;
use crate::transpiler::ast::*;
use crate::transpiler::declarations::{
    collect_declarations_reserving, DeclarationField, DeclarationTable, Signature,
};
use crate::transpiler::visitor::{dispatch, Visitor};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_INTERFACE_NAME: &str = "MyInterface";
pub const DEFAULT_SOLIDITY_VERSION: &str = ">=0.7.0 <0.9.0";
pub const DEFAULT_LICENSE: &str = "MIT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    pub name: String,
    pub solidity_version: String,
    pub license: String,
    pub format_output: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            name: DEFAULT_INTERFACE_NAME.to_string(),
            solidity_version: DEFAULT_SOLIDITY_VERSION.to_string(),
            license: DEFAULT_LICENSE.to_string(),
            format_output: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no struct declaration for tuple signature {0}")]
    UnresolvedDeclaration(Signature),
    #[error("struct {0} has the same name as the interface")]
    NameCollision(String),
}

/// The construct that owns a parameter; decides which modifiers it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterContext {
    FunctionInput,
    FunctionOutput,
    EventInput,
    ErrorInput,
}

/// Collects struct declarations for `abi` and renders the interface.
pub fn generate(abi: &Abi, options: &GenerateOptions) -> Result<String> {
    let declarations = collect_declarations_reserving(abi, &[options.name.as_str()]);
    generate_solidity_interface(abi, &declarations, options)
}

pub fn generate_solidity_interface(
    abi: &Abi,
    declarations: &DeclarationTable,
    options: &GenerateOptions,
) -> Result<String> {
    if let Some((_, clash)) = declarations
        .iter()
        .find(|(_, declaration)| declaration.identifier == options.name)
    {
        return Err(GenerateError::NameCollision(clash.identifier.clone()).into());
    }

    let mut generator = InterfaceGenerator { declarations };

    // Render every entry; constructors come back empty
    let mut members = Vec::new();
    for entry in abi.entries.iter() {
        let member = dispatch(&mut generator, entry.into(), None)?;
        if !member.is_empty() {
            members.push(member);
        }
    }
    debug!("rendered {} interface members", members.len());

    // Header, structs, interface body, then the source ABI
    let mut sections = vec![generate_header(options, !declarations.is_empty())];
    if !declarations.is_empty() {
        sections.push(generator.generate_declarations()?);
    }
    sections.push(generate_interface(&options.name, &members));
    sections.push(generate_footer(&abi.json)?);

    let mut output = sections.join("\n\n");
    output.push('\n');

    if options.format_output {
        match formatter::format(&output) {
            Ok(formatted) => return Ok(formatted),
            Err(err) => warn!("Formatting failed, emitting unformatted source: {}", err),
        }
    }
    Ok(output)
}

fn generate_header(options: &GenerateOptions, uses_structs: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!("// SPDX-License-Identifier: {}\n", options.license));
    output.push_str(&format!(
        "// !! THIS FILE WAS AUTOGENERATED BY {} v{}. SEE SOURCE BELOW. !!\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    output.push_str(&format!("pragma solidity {};", options.solidity_version));
    if uses_structs {
        output.push_str("\npragma experimental ABIEncoderV2;");
    }
    output
}

fn generate_interface(name: &str, members: &[String]) -> String {
    let mut output = format!("interface {} {{\n", name);
    for member in members {
        output.push_str(&format!("    {}\n", member));
    }
    output.push('}');
    output
}

fn generate_footer(json: &Value) -> Result<String> {
    let json = serde_json::to_string_pretty(json)
        .with_context(|| "Failed to serialize ABI for the source footer")?;
    // `\/` is a valid JSON escape and keeps the comment from closing early
    Ok(format!(
        "// THIS FILE WAS AUTOGENERATED FROM THE FOLLOWING ABI JSON:\n/*\n{}\n*/",
        json.replace("*/", "*\\/")
    ))
}

/// Struct members must be named. Unnamed ones become `_<index>`, prefixed
/// with more underscores while that name is used by another member.
fn field_names(fields: &[DeclarationField]) -> Vec<String> {
    let mut taken: HashSet<String> = fields
        .iter()
        .filter(|field| !field.name.is_empty())
        .map(|field| field.name.clone())
        .collect();

    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            if !field.name.is_empty() {
                return field.name.clone();
            }
            let mut name = format!("_{}", index);
            while taken.contains(&name) {
                name.insert(0, '_');
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

struct InterfaceGenerator<'t> {
    declarations: &'t DeclarationTable,
}

impl<'t> InterfaceGenerator<'t> {
    fn identifier(&self, signature: &Signature) -> Result<&'t str> {
        self.declarations
            .get(signature)
            .map(|declaration| declaration.identifier.as_str())
            .ok_or_else(|| GenerateError::UnresolvedDeclaration(signature.clone()).into())
    }

    /// The type as written in source: tuples become their struct name with
    /// array dimensions kept.
    fn display_type(&self, param_type: &str, signature: Option<&Signature>) -> Result<String> {
        match signature {
            Some(signature) => {
                Ok(format!("{}{}", self.identifier(signature)?, array_suffix(param_type)))
            }
            None => Ok(param_type.to_string()),
        }
    }

    fn render_parameters(
        &mut self,
        parameters: &[Parameter],
        context: ParameterContext,
    ) -> Result<String> {
        let mut rendered = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            rendered.push(dispatch(&mut *self, parameter.into(), Some(context))?);
        }
        Ok(rendered.join(", "))
    }

    fn generate_declarations(&self) -> Result<String> {
        let mut structs = Vec::new();
        for (_, declaration) in self.declarations.iter() {
            let mut output = format!("struct {} {{\n", declaration.identifier);

            // Fields keep their original order; nested tuples resolve to
            // the struct declared for them
            let names = field_names(&declaration.fields);
            for (field, name) in declaration.fields.iter().zip(names) {
                let field_type = self.display_type(&field.param_type, field.signature.as_ref())?;
                output.push_str(&format!("    {} {};\n", field_type, name));
            }

            output.push('}');
            structs.push(output);
        }
        Ok(structs.join("\n\n"))
    }
}

fn is_reference(parameter: &Parameter) -> bool {
    if parameter.is_structured() {
        return true;
    }
    match TypeName::parse(&parameter.param_type) {
        Ok(type_name) => type_name.is_reference(),
        Err(err) => {
            warn!("{:#}; rendering `{}` as written", err, parameter.param_type);
            false
        }
    }
}

impl<'a, 't> Visitor<'a> for InterfaceGenerator<'t> {
    type Output = Result<String>;
    type Context = ParameterContext;

    fn visit_function(
        &mut self,
        entry: &'a FunctionEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        let inputs = self.render_parameters(&entry.inputs, ParameterContext::FunctionInput)?;
        let mut output = format!("function {}({}) external", entry.name, inputs);
        if let Some(keyword) = entry.mutability.effective().keyword() {
            output.push(' ');
            output.push_str(keyword);
        }
        if !entry.outputs.is_empty() {
            let outputs =
                self.render_parameters(&entry.outputs, ParameterContext::FunctionOutput)?;
            output.push_str(&format!(" returns ({})", outputs));
        }
        output.push(';');
        Ok(output)
    }

    // interfaces cannot declare constructors
    fn visit_constructor(
        &mut self,
        _: &'a ConstructorEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        Ok(String::new())
    }

    fn visit_fallback(
        &mut self,
        entry: &'a FallbackEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        match entry.mutability.effective() {
            StateMutability::Payable => Ok("fallback() external payable;".to_string()),
            _ => Ok("fallback() external;".to_string()),
        }
    }

    fn visit_receive(
        &mut self,
        _: &'a ReceiveEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        Ok("receive() external payable;".to_string())
    }

    fn visit_event(
        &mut self,
        entry: &'a EventEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        let inputs = self.render_parameters(&entry.inputs, ParameterContext::EventInput)?;
        let anonymous = if entry.anonymous { " anonymous" } else { "" };
        Ok(format!("event {}({}){};", entry.name, inputs, anonymous))
    }

    fn visit_error(
        &mut self,
        entry: &'a ErrorEntry,
        _: Option<ParameterContext>,
    ) -> Result<String> {
        let inputs = self.render_parameters(&entry.inputs, ParameterContext::ErrorInput)?;
        Ok(format!("error {}({});", entry.name, inputs))
    }

    fn visit_parameter(
        &mut self,
        parameter: &'a Parameter,
        context: Option<ParameterContext>,
    ) -> Result<String> {
        let signature = Signature::of_parameter(parameter);
        let mut parts = vec![self.display_type(&parameter.param_type, signature.as_ref())?];

        let modifier = match context {
            Some(ParameterContext::FunctionInput) if is_reference(parameter) => Some("calldata"),
            Some(ParameterContext::FunctionOutput) if is_reference(parameter) => Some("memory"),
            Some(ParameterContext::EventInput) if parameter.is_indexed() => Some("indexed"),
            _ => None,
        };
        if let Some(modifier) = modifier {
            parts.push(modifier.to_string());
        }

        if !parameter.name.is_empty() {
            parts.push(parameter.name.clone());
        }
        Ok(parts.join(" "))
    }
}
