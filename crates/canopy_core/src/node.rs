//! Node handles, the `Model` trait and slot descriptors.
//!
//! A node type declares its child slots once, in declaration order, with the
//! [`slots!`](crate::slots) macro. The tree only ever reads slots through the
//! generated descriptor table and index accessors, and only the tree can
//! change what a slot holds.

use crate::error::PropertyError;
use crate::links::Scope;
use crate::types::TypeInfo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

/// Generational handle to a node in a [`Tree`](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour shared by every node type.
pub trait Model: AsAny + fmt::Debug {
    fn type_info(&self) -> &'static TypeInfo;

    /// Child slot descriptors in declaration order.
    fn slots(&self) -> &'static [SlotDecl] {
        &[]
    }

    fn slot(&self, _index: usize) -> Option<SlotRef<'_>> {
        None
    }

    fn slot_mut(&mut self, _index: usize) -> Option<SlotMut<'_>> {
        None
    }

    /// Plain (non-child) attributes.
    fn properties(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Looks up one attribute. Types with links override this to expose the
    /// linked node.
    fn property(&self, name: &str) -> Option<Target> {
        self.properties().remove(name).map(Target::Value)
    }

    fn set_property(&mut self, _name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::Unknown)
    }

    /// Fills this node's dependencies from its scope.
    fn resolve_links(&mut self, _scope: &Scope) -> crate::Result<()> {
        Ok(())
    }
}

/// Result of resolving an attribute or path.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Node(NodeId),
    Value(Value),
}

impl Target {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Node(_) => None,
            Self::Value(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Node(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Single,
    List,
}

/// Descriptor of one child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecl {
    pub name: &'static str,
    pub kind: SlotKind,
    /// Declared type (single) or element type (list).
    pub accepts: &'static str,
}

/// Single-valued child slot.
///
/// A clone is empty: a child handle belongs to exactly one slot.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Child(Option<NodeId>);

impl Clone for Child {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl Child {
    pub fn get(&self) -> Option<NodeId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn replace(&mut self, id: NodeId) -> Option<NodeId> {
        self.0.replace(id)
    }

    pub(crate) fn clear_if(&mut self, id: NodeId) -> bool {
        if self.0 == Some(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }
}

/// List-valued child slot, instantiated on first use.
///
/// Like [`Child`], a clone starts out uninstantiated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Children(Option<Vec<NodeId>>);

impl Clone for Children {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl Children {
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `false` until something has been placed in the slot.
    pub fn is_instantiated(&self) -> bool {
        self.0.is_some()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.iter().any(|c| c == id)
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        self.0.get_or_insert_with(Vec::new).push(id);
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> bool {
        let Some(list) = self.0.as_mut() else {
            return false;
        };
        match list.iter().position(|c| *c == id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }
}

pub enum SlotRef<'a> {
    Single(&'a Child),
    List(&'a Children),
}

pub enum SlotMut<'a> {
    Single(&'a mut Child),
    List(&'a mut Children),
}

impl SlotRef<'_> {
    pub fn contains(&self, id: NodeId) -> bool {
        match self {
            Self::Single(child) => child.get() == Some(id),
            Self::List(children) => children.contains(id),
        }
    }

    pub(crate) fn collect_into(&self, out: &mut Vec<NodeId>) {
        match self {
            Self::Single(child) => out.extend(child.get()),
            Self::List(children) => out.extend(children.iter()),
        }
    }
}

/// Serializes a model's plain fields into a property map.
///
/// Slot and link fields should carry `#[serde(skip)]`.
pub fn properties_of<T: Serialize>(model: &T) -> Map<String, Value> {
    match serde_json::to_value(model) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Assigns a JSON value to a typed field.
pub fn assign<T: DeserializeOwned>(field: &mut T, value: Value) -> Result<(), PropertyError> {
    *field = serde_json::from_value(value).map_err(|e| PropertyError::invalid(e.to_string()))?;
    Ok(())
}

/// Declares a model's child slots inside its `impl Model` block.
///
/// ```ignore
/// impl Model for Zone {
///     fn type_info(&self) -> &'static TypeInfo { Self::TYPE }
///     slots! {
///         soil: Single("Soil"),
///         children: List("Model"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! slots {
    ($($field:ident : $kind:ident($accepts:expr)),* $(,)?) => {
        fn slots(&self) -> &'static [$crate::SlotDecl] {
            const SLOTS: &[$crate::SlotDecl] = &[
                $($crate::SlotDecl {
                    name: stringify!($field),
                    kind: $crate::SlotKind::$kind,
                    accepts: $accepts,
                }),*
            ];
            SLOTS
        }

        #[allow(unused_mut, unused_variables, unused_assignments)]
        fn slot(&self, index: usize) -> Option<$crate::SlotRef<'_>> {
            let mut current = 0usize;
            $(
                if index == current {
                    return Some($crate::slots!(@ref $kind, &self.$field));
                }
                current += 1;
            )*
            None
        }

        #[allow(unused_mut, unused_variables, unused_assignments)]
        fn slot_mut(&mut self, index: usize) -> Option<$crate::SlotMut<'_>> {
            let mut current = 0usize;
            $(
                if index == current {
                    return Some($crate::slots!(@mut $kind, &mut self.$field));
                }
                current += 1;
            )*
            None
        }
    };
    (@ref Single, $e:expr) => { $crate::SlotRef::Single($e) };
    (@ref List, $e:expr) => { $crate::SlotRef::List($e) };
    (@mut Single, $e:expr) => { $crate::SlotMut::Single($e) };
    (@mut List, $e:expr) => { $crate::SlotMut::List($e) };
}
