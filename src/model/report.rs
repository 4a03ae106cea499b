//! Collects variables by path.

use canopy_core::{
    properties_of, Model, ModelType, NodeId, PropertyError, Target, Tree, TypeInfo, TypeResolver,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Reads a list of `get` paths relative to itself.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    #[serde(rename = "VariableNames")]
    pub variable_names: Vec<String>,
}

impl Report {
    pub fn new<S: Into<String>>(variable_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            variable_names: variable_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Evaluates every variable from `origin`, the report's own node.
    ///
    /// Missing values become `null`; nodes are reported by full path.
    pub fn collect(
        &self,
        tree: &Tree,
        origin: NodeId,
        types: &dyn TypeResolver,
    ) -> canopy_core::Result<IndexMap<String, Value>> {
        let mut row = IndexMap::new();
        for name in &self.variable_names {
            let value = match tree.get(origin, name, types)? {
                Some(Target::Value(value)) => value,
                Some(Target::Node(id)) => Value::from(tree.full_path(id)?),
                None => Value::Null,
            };
            row.insert(name.clone(), value);
        }
        Ok(row)
    }
}

impl ModelType for Report {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Report", &[]);
}

impl Model for Report {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    fn properties(&self) -> Map<String, Value> {
        properties_of(self)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "VariableNames" => canopy_core::assign(&mut self.variable_names, value),
            _ => Err(PropertyError::Unknown),
        }
    }
}
