//! Script host node and the rebuild protocol.
//!
//! A [`ScriptHost`] owns exactly one embedded [`ScriptInstance`] compiled from
//! its source text. [`ScriptEngine`] compiles, rebuilds, loads and saves
//! hosts. A rebuild never touches the current instance until the new source
//! has compiled.

use crate::compiler::{ComponentCompiler, SourceCompiler, ENTRY_TYPE};
use crate::config::ScriptConfig;
use crate::error::{Result, ScriptError};
use crate::instance::ScriptInstance;
use crate::script_type::{Reconciliation, ScriptType};
use canopy_core::{slots, Child, Model, ModelType, NodeId, Tree, TypeInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node holding source text and the instance compiled from it.
#[derive(Debug, Default)]
pub struct ScriptHost {
    source: String,
    embedded: Child,
}

impl ScriptHost {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn embedded(&self) -> Option<NodeId> {
        self.embedded.get()
    }
}

impl ModelType for ScriptHost {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Manager", &[]);
}

impl Model for ScriptHost {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        embedded: Single("Script"),
    }

    fn properties(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("source".to_string(), Value::from(self.source.as_str()));
        map
    }
}

/// Persisted form of a host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptRecord {
    pub name: String,
    pub source: String,
    /// Field values of the embedded instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Result of a successful rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuild {
    pub instance: NodeId,
    pub reconciliation: Reconciliation,
}

/// Compiles and manages script hosts in a tree.
pub struct ScriptEngine {
    compiler: Box<dyn SourceCompiler>,
    config: ScriptConfig,
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new(ComponentCompiler, ScriptConfig::default())
    }
}

impl ScriptEngine {
    pub fn new(compiler: impl SourceCompiler + 'static, config: ScriptConfig) -> Self {
        Self {
            compiler: Box::new(compiler),
            config,
        }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Compiles `source` and returns its entry type.
    pub fn compile_entry(&self, source: &str) -> Result<ScriptType> {
        let unit = self.compiler.compile(source)?;
        Ok(unit.entry()?.clone())
    }

    pub fn host(tree: &Tree, id: NodeId) -> Result<&ScriptHost> {
        match tree.downcast::<ScriptHost>(id) {
            Some(host) => Ok(host),
            None => Err(ScriptError::NotAHost {
                path: tree.full_path(id)?,
            }),
        }
    }

    /// The embedded instance of a host, if it has one.
    pub fn instance(tree: &Tree, host: NodeId) -> Result<Option<&ScriptInstance>> {
        Ok(Self::host(tree, host)?
            .embedded()
            .and_then(|id| tree.downcast::<ScriptInstance>(id)))
    }

    /// Creates a host from source text with a default-valued instance and
    /// adds it under `parent`.
    pub fn create(&self, tree: &mut Tree, parent: NodeId, name: &str, source: &str) -> Result<NodeId> {
        self.load(
            tree,
            parent,
            &ScriptRecord {
                name: name.to_string(),
                source: source.to_string(),
                payload: None,
            },
        )
    }

    /// Replaces the host's source and rebuilds its instance, carrying over
    /// compatible field values.
    ///
    /// If `source` does not compile, the host keeps its previous source and
    /// instance.
    pub fn rebuild(&self, tree: &mut Tree, host: NodeId, source: &str) -> Result<Rebuild> {
        let path = tree.full_path(host)?;
        let old = Self::host(tree, host)?.embedded();
        let snapshot = old
            .and_then(|id| tree.downcast::<ScriptInstance>(id))
            .map(ScriptInstance::snapshot);

        let script_type = match self.compile_entry(source) {
            Ok(script_type) => script_type,
            Err(e) => {
                tracing::warn!(host = %path, "Rebuild failed, keeping previous instance");
                return Err(e);
            }
        };

        let (instance, reconciliation) = match &snapshot {
            Some(snapshot) => script_type.reconstruct(snapshot),
            None => (script_type.instantiate(), Reconciliation::default()),
        };

        if let Some(old) = old {
            tree.remove(host, old)?;
        }
        let id = tree.insert(ENTRY_TYPE, instance);
        if let Err(e) = tree.add(host, id, false) {
            tree.delete(id)?;
            if let Some(old) = old {
                tree.add(host, old, false)?;
            }
            return Err(e.into());
        }
        if let Some(old) = old {
            tree.delete(old)?;
        }
        if let Some(model) = tree.downcast_mut::<ScriptHost>(host) {
            model.source = source.to_string();
        }
        tracing::info!(
            host = %path,
            retained = reconciliation.retained.len(),
            reset = reconciliation.reset.len(),
            dropped = reconciliation.dropped.len(),
            "Rebuilt script"
        );

        if self.config.relink_on_rebuild {
            tree.resolve_links(id)?;
        }
        Ok(Rebuild {
            instance: id,
            reconciliation,
        })
    }

    /// Restores a host from its persisted form and adds it under `parent`.
    ///
    /// Nothing is left in the tree if any step fails.
    pub fn load(&self, tree: &mut Tree, parent: NodeId, record: &ScriptRecord) -> Result<NodeId> {
        let script_type = self.compile_entry(&record.source)?;
        let instance = match &record.payload {
            Some(payload) => script_type.deserialize(payload)?,
            None => script_type.instantiate(),
        };

        let host = tree.insert(
            record.name.clone(),
            ScriptHost {
                source: record.source.clone(),
                embedded: Child::default(),
            },
        );
        let embedded = tree.insert(ENTRY_TYPE, instance);
        let placed = tree
            .add(host, embedded, false)
            .and_then(|()| tree.add(parent, host, false));
        if let Err(e) = placed {
            tree.delete(host)?;
            if tree.contains(embedded) {
                tree.delete(embedded)?;
            }
            return Err(e.into());
        }
        tracing::debug!(host = %tree.full_path(host)?, "Loaded script");
        Ok(host)
    }

    /// Persisted form of a host.
    pub fn save(&self, tree: &Tree, host: NodeId) -> Result<ScriptRecord> {
        let model = Self::host(tree, host)?;
        let payload = model
            .embedded()
            .and_then(|id| tree.downcast::<ScriptInstance>(id))
            .map(|instance| instance.snapshot().to_payload());
        Ok(ScriptRecord {
            name: tree.name(host)?.to_string(),
            source: model.source.clone(),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::containers::{Folder, Simulation, Zone};
    use canopy_core::TreeError;
    use serde_json::json;

    const V1: &str = "pub component Script { x: real = 0; }";
    const V2: &str = "pub component Script { x: real = 0; y: real = 2; }";

    fn setup() -> (Tree, NodeId, ScriptEngine) {
        let mut tree = Tree::new();
        let sim = tree.insert("Sim1", Simulation::default());
        (tree, sim, ScriptEngine::default())
    }

    #[test]
    fn test_rebuild_preserves_state() {
        let (mut tree, sim, engine) = setup();
        let host = engine.create(&mut tree, sim, "Manager", V1).unwrap();
        let first = ScriptEngine::instance(&tree, host).unwrap().unwrap();
        assert_eq!(first.value("x"), Some(&json!(0.0)));

        let script = ScriptEngine::host(&tree, host).unwrap().embedded().unwrap();
        tree.set(script, "x", json!(1), &canopy_core::TypeRegistry::new())
            .unwrap();

        let rebuild = engine.rebuild(&mut tree, host, V2).unwrap();
        assert_eq!(rebuild.reconciliation.retained, vec!["x".to_string()]);
        let next = ScriptEngine::instance(&tree, host).unwrap().unwrap();
        assert_eq!(next.value("x"), Some(&json!(1.0)));
        assert_eq!(next.value("y"), Some(&json!(2.0)));
        assert!(!tree.contains(script));
        assert_eq!(ScriptEngine::host(&tree, host).unwrap().source(), V2);
    }

    #[test]
    fn test_rebuild_of_empty_host_uses_defaults() {
        let (mut tree, sim, engine) = setup();
        let host = tree
            .add_new(sim, "Manager", ScriptHost::default(), false)
            .unwrap();
        assert!(ScriptEngine::instance(&tree, host).unwrap().is_none());

        let rebuild = engine
            .rebuild(&mut tree, host, "pub component Script { x: real = 3; }")
            .unwrap();
        assert_eq!(rebuild.reconciliation, Reconciliation::default());

        let instance = ScriptEngine::instance(&tree, host).unwrap().unwrap();
        assert_eq!(instance.value("x"), Some(&json!(3.0)));
        assert_eq!(tree.parent(rebuild.instance).unwrap(), Some(host));
    }

    #[test]
    fn test_failed_rebuild_keeps_instance_and_source() {
        let (mut tree, sim, engine) = setup();
        let host = engine.create(&mut tree, sim, "Manager", V1).unwrap();
        let before = ScriptEngine::host(&tree, host).unwrap().embedded().unwrap();

        let err = engine
            .rebuild(&mut tree, host, "pub component Script { x: real = ; }")
            .unwrap_err();
        assert!(matches!(err, ScriptError::Compile(_)));

        let model = ScriptEngine::host(&tree, host).unwrap();
        assert_eq!(model.embedded(), Some(before));
        assert_eq!(model.source(), V1);
        assert_eq!(tree.parent(before).unwrap(), Some(host));
    }

    #[test]
    fn test_rebuild_relinks_new_instance() {
        let (mut tree, sim, engine) = setup();
        let field = tree.add_new(sim, "Field1", Zone::default(), false).unwrap();
        let host = engine.create(&mut tree, sim, "Manager", V1).unwrap();

        engine
            .rebuild(&mut tree, host, "pub component Script { link field: Zone; }")
            .unwrap();
        let instance = ScriptEngine::instance(&tree, host).unwrap().unwrap();
        // descendants of the zone come before the zone itself
        assert_eq!(instance.link("field"), Some(field));
    }

    #[test]
    fn test_rebuild_without_relink() {
        let mut tree = Tree::new();
        let sim = tree.insert("Sim1", Simulation::default());
        let engine = ScriptEngine::new(
            ComponentCompiler,
            ScriptConfig {
                relink_on_rebuild: false,
            },
        );
        let host = engine.create(&mut tree, sim, "Manager", V1).unwrap();
        engine
            .rebuild(&mut tree, host, "pub component Script { link clock: Clock; }")
            .unwrap();
        let instance = ScriptEngine::instance(&tree, host).unwrap().unwrap();
        assert_eq!(instance.link("clock"), None);
    }

    #[test]
    fn test_save_then_load() {
        let (mut tree, sim, engine) = setup();
        let host = engine.create(&mut tree, sim, "Manager", V2).unwrap();
        let script = ScriptEngine::host(&tree, host).unwrap().embedded().unwrap();
        tree.set(script, "y", json!(5.5), &canopy_core::TypeRegistry::new())
            .unwrap();

        let record = engine.save(&tree, host).unwrap();
        assert_eq!(record.name, "Manager");
        assert_eq!(record.payload, Some(json!({ "x": 0.0, "y": 5.5 })));

        let other = tree.insert("Sim2", Simulation::default());
        let restored = engine.load(&mut tree, other, &record).unwrap();
        let instance = ScriptEngine::instance(&tree, restored).unwrap().unwrap();
        assert_eq!(instance.value("y"), Some(&json!(5.5)));
        assert_eq!(tree.full_path(restored).unwrap(), ".Sim2.Manager");
    }

    #[test]
    fn test_load_failures_leave_nothing_behind() {
        let (mut tree, sim, engine) = setup();
        let before = tree.len();

        let bad_payload = ScriptRecord {
            name: "Manager".into(),
            source: V1.into(),
            payload: Some(json!({ "x": "high" })),
        };
        assert!(matches!(
            engine.load(&mut tree, sim, &bad_payload),
            Err(ScriptError::Payload { .. })
        ));

        let bystander = tree.insert("Notes", Folder::default());
        let other_host = tree.insert("Other", ScriptHost::default());
        let record = ScriptRecord {
            name: "Manager".into(),
            source: V1.into(),
            payload: None,
        };
        // a host only accepts a Script child
        assert!(matches!(
            engine.load(&mut tree, other_host, &record),
            Err(ScriptError::Tree(TreeError::SlotNotFound { .. }))
        ));
        assert_eq!(tree.len(), before + 2);
        assert!(tree.contains(bystander));
    }

    #[test]
    fn test_not_a_host() {
        let (tree, sim, engine) = setup();
        assert_eq!(
            engine.save(&tree, sim),
            Err(ScriptError::NotAHost {
                path: ".Sim1".into()
            })
        );
    }
}
