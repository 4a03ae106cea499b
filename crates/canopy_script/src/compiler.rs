//! Source compilers.
//!
//! [`SourceCompiler`] is the seam a host uses to turn source text into
//! component types. [`ComponentCompiler`] implements it for the built-in
//! declarative component language.

use crate::ast::{ComponentDef, Literal, Member, Spanned};
use crate::error::{CompileError, Diagnostic};
use crate::parser;
use crate::script_type::{FieldKind, ScriptType};
use serde_json::Value;
use std::collections::HashSet;

/// Name of the one public type a compiled unit must expose.
pub const ENTRY_TYPE: &str = "Script";

/// Turns source text into component types.
pub trait SourceCompiler {
    fn compile(&self, source: &str) -> Result<CompiledUnit, CompileError>;
}

/// Types produced by one compilation.
#[derive(Debug, Clone, Default)]
pub struct CompiledUnit {
    types: Vec<ScriptType>,
}

impl CompiledUnit {
    pub fn new(types: Vec<ScriptType>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &[ScriptType] {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&ScriptType> {
        self.types.iter().find(|ty| ty.name() == name)
    }

    /// The public `Script` type. Missing or duplicated entries are errors.
    pub fn entry(&self) -> Result<&ScriptType, CompileError> {
        let mut entries = self
            .types
            .iter()
            .filter(|ty| ty.is_public() && ty.name() == ENTRY_TYPE);
        match (entries.next(), entries.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(CompileError::single(Diagnostic {
                line: 1,
                column: 1,
                message: format!("no public component named {ENTRY_TYPE}"),
            })),
            (Some(_), Some(_)) => Err(CompileError::single(Diagnostic {
                line: 1,
                column: 1,
                message: format!("more than one public component named {ENTRY_TYPE}"),
            })),
        }
    }
}

/// Compiler for the built-in component language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentCompiler;

impl ComponentCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl SourceCompiler for ComponentCompiler {
    fn compile(&self, source: &str) -> Result<CompiledUnit, CompileError> {
        let unit = parser::parse(source)?;
        let mut diagnostics = Vec::new();
        let mut names = HashSet::new();
        let mut types = Vec::new();

        for def in &unit.components {
            if !names.insert(def.name.node.as_str()) {
                diagnostics.push(Diagnostic::at(
                    source,
                    def.name.span.start,
                    format!("duplicate component '{}'", def.name.node),
                ));
                continue;
            }
            types.push(lower(source, def, &mut diagnostics));
        }

        if !diagnostics.is_empty() {
            return Err(CompileError::new(diagnostics));
        }
        let unit = CompiledUnit::new(types);
        unit.entry()?;
        tracing::debug!(types = unit.types().len(), "Compiled source");
        Ok(unit)
    }
}

fn lower(source: &str, def: &ComponentDef, diagnostics: &mut Vec<Diagnostic>) -> ScriptType {
    let mut ty = ScriptType::new(def.name.node.clone(), def.public);
    let mut members = HashSet::new();

    for member in &def.members {
        let name = member.name();
        if !members.insert(name.node.as_str()) {
            diagnostics.push(Diagnostic::at(
                source,
                name.span.start,
                format!("duplicate member '{}' in {}", name.node, def.name.node),
            ));
            continue;
        }
        match member {
            Member::Field { kind, default, .. } => {
                let Some(field_kind) = FieldKind::from_name(&kind.node) else {
                    diagnostics.push(Diagnostic::at(
                        source,
                        kind.span.start,
                        format!("unknown field kind '{}'", kind.node),
                    ));
                    continue;
                };
                let value = match default {
                    None => field_kind.zero(),
                    Some(literal) => match literal_value(field_kind, literal) {
                        Some(value) => value,
                        None => {
                            diagnostics.push(Diagnostic::at(
                                source,
                                literal.span.start,
                                format!("{} is not a valid {field_kind}", literal.node),
                            ));
                            continue;
                        }
                    },
                };
                ty = ty.with_field(name.node.clone(), field_kind, value);
            }
            Member::Link {
                type_name,
                optional,
                ..
            } => {
                ty = ty.with_link(name.node.clone(), type_name.node.clone(), *optional);
            }
        }
    }
    ty
}

fn literal_value(kind: FieldKind, literal: &Spanned<Literal>) -> Option<Value> {
    match (kind, &literal.node) {
        (FieldKind::Real, Literal::Real(v)) => Some(Value::from(*v)),
        (FieldKind::Real, Literal::Int(v)) => Some(Value::from(*v as f64)),
        (FieldKind::Int, Literal::Int(v)) => Some(Value::from(*v)),
        (FieldKind::Text, Literal::Text(v)) => Some(Value::from(v.as_str())),
        (FieldKind::Bool, Literal::Bool(v)) => Some(Value::from(*v)),
        _ => None,
    }
}
