//! Node type for compiled script instances.

use crate::script_type::ScriptType;
use crate::snapshot::Snapshot;
use canopy_core::{Model, NodeId, PropertyError, Scope, Target, TypeInfo};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Every compiled entry type is placed in the tree under this name.
pub static SCRIPT_TYPE: TypeInfo = TypeInfo::new("Script", &[]);

/// A live instance of a [`ScriptType`].
#[derive(Debug, Clone)]
pub struct ScriptInstance {
    script_type: ScriptType,
    values: IndexMap<String, Value>,
    links: IndexMap<String, Option<NodeId>>,
}

impl ScriptInstance {
    pub(crate) fn new(script_type: ScriptType, values: IndexMap<String, Value>) -> Self {
        let links = script_type
            .links()
            .keys()
            .map(|name| (name.clone(), None))
            .collect();
        Self {
            script_type,
            values,
            links,
        }
    }

    pub fn script_type(&self) -> &ScriptType {
        &self.script_type
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Assigns a field, validating the value against the field kind.
    pub fn set_value(&mut self, field: &str, value: Value) -> Result<(), PropertyError> {
        if self.links.contains_key(field) {
            return Err(PropertyError::invalid("links are assigned by link resolution"));
        }
        let decl = self.script_type.field(field).ok_or(PropertyError::Unknown)?;
        let coerced = decl.kind.coerce(&value).ok_or_else(|| {
            PropertyError::invalid(format!("expected {}, got {value}", decl.kind))
        })?;
        self.values.insert(field.to_string(), coerced);
        Ok(())
    }

    /// Linked node, if the link is declared and resolved.
    pub fn link(&self, name: &str) -> Option<NodeId> {
        self.links.get(name).copied().flatten()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            type_name: self.script_type.name().to_string(),
            fields: self.values.clone(),
        }
    }
}

impl Model for ScriptInstance {
    fn type_info(&self) -> &'static TypeInfo {
        &SCRIPT_TYPE
    }

    fn properties(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn property(&self, name: &str) -> Option<Target> {
        if self.links.contains_key(name) {
            return self.link(name).map(Target::Node);
        }
        self.values.get(name).cloned().map(Target::Value)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.set_value(name, value)
    }

    fn resolve_links(&mut self, scope: &Scope) -> canopy_core::Result<()> {
        for (name, decl) in self.script_type.links() {
            let target = if decl.optional {
                scope.find(&decl.type_name)
            } else {
                Some(scope.require(&decl.type_name)?)
            };
            self.links.insert(name.clone(), target);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_type::FieldKind;
    use canopy_core::containers::Simulation;
    use canopy_core::{Tree, TreeError};
    use serde_json::json;

    fn script_type() -> ScriptType {
        ScriptType::new("Script", true)
            .with_field("x", FieldKind::Real, json!(1.0))
            .with_field("sown", FieldKind::Bool, json!(false))
            .with_link("sim", "Simulation", false)
            .with_link("weather", "Weather", true)
    }

    #[test]
    fn test_set_value_validates_kind() {
        let mut instance = script_type().instantiate();
        instance.set_value("x", json!(4)).unwrap();
        assert_eq!(instance.value("x"), Some(&json!(4.0)));
        assert!(matches!(
            instance.set_value("x", json!("four")),
            Err(PropertyError::Invalid(_))
        ));
        assert_eq!(instance.set_value("y", json!(1)), Err(PropertyError::Unknown));
        assert!(instance.set_value("sim", json!(1)).is_err());
    }

    #[test]
    fn test_links_resolve_in_scope() {
        let mut tree = Tree::new();
        let sim = tree.insert("Sim1", Simulation::default());
        let id = tree
            .add_new(sim, "Script", script_type().instantiate(), true)
            .unwrap();

        let instance = tree.downcast::<ScriptInstance>(id).unwrap();
        assert_eq!(instance.link("sim"), Some(sim));
        assert_eq!(instance.link("weather"), None);
        assert_eq!(instance.property("sim"), Some(Target::Node(sim)));
        assert_eq!(instance.property("x"), Some(Target::Value(json!(1.0))));
    }

    #[test]
    fn test_required_link_miss() {
        let mut tree = Tree::new();
        let sim = tree.insert("Sim1", Simulation::default());
        let ty = ScriptType::new("Script", true).with_link("clock", "Clock", false);
        let err = tree.add_new(sim, "Script", ty.instantiate(), true).unwrap_err();
        assert_eq!(err, TreeError::unresolved(".Sim1.Script", "Clock"));
    }
}
