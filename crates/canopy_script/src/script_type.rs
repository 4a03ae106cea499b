//! Component types produced by a compiler.
//!
//! A [`ScriptType`] is a runtime schema: an ordered set of typed fields with
//! defaults, plus declared links. Instances of it are
//! [`ScriptInstance`](crate::ScriptInstance) nodes.

use crate::error::{Result, ScriptError};
use crate::instance::ScriptInstance;
use crate::snapshot::Snapshot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Real,
    Int,
    Text,
    Bool,
}

impl FieldKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "real" => Some(Self::Real),
            "int" => Some(Self::Int),
            "text" => Some(Self::Text),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Int => "int",
            Self::Text => "text",
            Self::Bool => "bool",
        }
    }

    /// Zero value used when a field declares no default.
    pub fn zero(self) -> Value {
        match self {
            Self::Real => Value::from(0.0),
            Self::Int => Value::from(0),
            Self::Text => Value::from(""),
            Self::Bool => Value::from(false),
        }
    }

    /// Converts `value` into this kind, if it is compatible.
    ///
    /// Integers widen to `real`; whole reals do not narrow to `int`.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::Real, Value::Number(n)) => n.as_f64().map(Value::from),
            (Self::Int, Value::Number(n)) => n.as_i64().map(Value::from),
            (Self::Text, Value::String(_)) | (Self::Bool, Value::Bool(_)) => Some(value.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub kind: FieldKind,
    pub default: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDecl {
    pub type_name: String,
    /// A miss leaves the link empty instead of failing.
    pub optional: bool,
}

/// Per-field outcome of rebuilding an instance from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub retained: Vec<String>,
    /// Present in the snapshot but incompatible with the new kind.
    pub reset: Vec<String>,
    /// Present only in the snapshot.
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptType {
    name: String,
    public: bool,
    fields: IndexMap<String, FieldDecl>,
    links: IndexMap<String, LinkDecl>,
}

impl ScriptType {
    pub fn new(name: impl Into<String>, public: bool) -> Self {
        Self {
            name: name.into(),
            public,
            fields: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    /// Adds a field, replacing any earlier one of the same name.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind, default: Value) -> Self {
        self.fields.insert(name.into(), FieldDecl { kind, default });
        self
    }

    pub fn with_link(mut self, name: impl Into<String>, type_name: impl Into<String>, optional: bool) -> Self {
        self.links.insert(
            name.into(),
            LinkDecl {
                type_name: type_name.into(),
                optional,
            },
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDecl> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.get(name)
    }

    pub fn links(&self) -> &IndexMap<String, LinkDecl> {
        &self.links
    }

    fn defaults(&self) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, decl)| (name.clone(), decl.default.clone()))
            .collect()
    }

    /// New instance with every field at its default.
    pub fn instantiate(&self) -> ScriptInstance {
        ScriptInstance::new(self.clone(), self.defaults())
    }

    /// Best-effort rebuild of an instance from a snapshot of an instance of
    /// a previous version of this type.
    pub fn reconstruct(&self, snapshot: &Snapshot) -> (ScriptInstance, Reconciliation) {
        let mut values = self.defaults();
        let mut report = Reconciliation::default();

        for (name, old) in &snapshot.fields {
            match self.fields.get(name) {
                None => report.dropped.push(name.clone()),
                Some(decl) => match decl.kind.coerce(old) {
                    Some(value) => {
                        values.insert(name.clone(), value);
                        report.retained.push(name.clone());
                    }
                    None => report.reset.push(name.clone()),
                },
            }
        }

        if !report.dropped.is_empty() {
            tracing::debug!(fields = ?report.dropped, "Dropped fields missing from the new type");
        }
        if !report.reset.is_empty() {
            tracing::warn!(fields = ?report.reset, "Reset incompatible fields to defaults");
        }
        (ScriptInstance::new(self.clone(), values), report)
    }

    /// Strictly reads a persisted payload. Missing fields take defaults;
    /// unknown or mistyped fields are errors.
    pub fn deserialize(&self, payload: &Value) -> Result<ScriptInstance> {
        let Value::Object(map) = payload else {
            return Err(ScriptError::payload(&self.name, "expected an object"));
        };
        let mut values = self.defaults();
        for (name, value) in map {
            let decl = self
                .fields
                .get(name)
                .ok_or_else(|| ScriptError::payload(&self.name, format!("unknown field '{name}'")))?;
            let value = decl.kind.coerce(value).ok_or_else(|| {
                ScriptError::payload(&self.name, format!("field '{name}' expects {}", decl.kind))
            })?;
            values.insert(name.clone(), value);
        }
        Ok(ScriptInstance::new(self.clone(), values))
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            write!(f, "pub ")?;
        }
        writeln!(f, "component {} {{", self.name)?;
        for (name, decl) in &self.fields {
            writeln!(f, "    {name}: {} = {};", decl.kind, decl.default)?;
        }
        for (name, link) in &self.links {
            let mark = if link.optional { "?" } else { "" };
            writeln!(f, "    link {name}{mark}: {};", link.type_name)?;
        }
        write!(f, "}}")
    }
}
