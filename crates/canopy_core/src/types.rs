//! Static type descriptors and the name → type registry.
//!
//! Type identity in the tree is nominal. Each node type carries a
//! [`TypeInfo`] listing its own name and the flattened names of every type it
//! can stand in for. Assignability is a membership test on that list, which
//! keeps it usable for types produced at runtime (compiled scripts) as well
//! as for Rust structs.

use crate::node::Model;
use std::collections::BTreeMap;
use std::fmt;

/// Name every node type is assignable to.
pub const MODEL: &str = "Model";

/// Descriptor for a node type.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub name: &'static str,
    /// Every ancestor type, flattened.
    pub bases: &'static [&'static str],
}

impl TypeInfo {
    pub const fn new(name: &'static str, bases: &'static [&'static str]) -> Self {
        Self { name, bases }
    }

    /// Returns `true` if a value of this type can be used where `type_name`
    /// is expected.
    pub fn is(&self, type_name: &str) -> bool {
        type_name == MODEL || self.name == type_name || self.bases.contains(&type_name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Associates a Rust type with its static descriptor.
pub trait ModelType {
    const TYPE: &'static TypeInfo;
}

/// Resolves unqualified type names, as used by `[TypeName]` path segments.
pub trait TypeResolver {
    fn resolve(&self, name: &str) -> Option<&'static TypeInfo>;
}

/// Builds a default instance of a registered type.
pub type Factory = fn() -> Box<dyn Model>;

fn construct<T: Model + Default + 'static>() -> Box<dyn Model> {
    Box::new(T::default())
}

#[derive(Clone, Copy)]
struct Registration {
    info: &'static TypeInfo,
    factory: Option<Factory>,
}

/// Registry of known node types.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<&'static str, Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type that can be constructed with defaults.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: ModelType + Model + Default + 'static,
    {
        self.insert(T::TYPE, Some(construct::<T> as Factory))
    }

    /// Registers a type by descriptor only.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> &mut Self {
        self.insert(info, None)
    }

    fn insert(&mut self, info: &'static TypeInfo, factory: Option<Factory>) -> &mut Self {
        if self
            .types
            .insert(info.name, Registration { info, factory })
            .is_some()
        {
            tracing::warn!(type_name = info.name, "Replacing registered type");
        }
        self
    }

    /// Creates a default instance of the named type.
    pub fn create(&self, name: &str) -> Option<Box<dyn Model>> {
        self.types.get(name).and_then(|r| r.factory).map(|f| f())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<&'static TypeInfo> {
        self.types.get(name).map(|r| r.info)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}
