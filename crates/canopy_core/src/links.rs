//! Dependency injection.
//!
//! Each node type fills its own [`Link`] fields in
//! [`Model::resolve_links`](crate::Model::resolve_links) from a materialized
//! [`Scope`]. [`Tree::resolve_links`] drives that call over a subtree,
//! depth-first and pre-order.

use crate::error::{Result, TreeError};
use crate::node::{Model, NodeId};
use crate::tree::Tree;
use crate::types::{ModelType, TypeInfo};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone)]
pub struct ScopeEntry {
    pub id: NodeId,
    pub name: String,
    pub type_info: &'static TypeInfo,
}

/// The visibility set of one node, in resolution order.
#[derive(Debug, Clone)]
pub struct Scope {
    origin: NodeId,
    origin_path: String,
    entries: Vec<ScopeEntry>,
}

impl Scope {
    pub(crate) fn new(origin: NodeId, origin_path: String, entries: Vec<ScopeEntry>) -> Self {
        Self {
            origin,
            origin_path,
            entries,
        }
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    pub fn origin_path(&self) -> &str {
        &self.origin_path
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, type_name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|e| e.type_info.is(type_name))
            .map(|e| e.id)
    }

    pub fn find_all(&self, type_name: &str) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter(|e| e.type_info.is(type_name))
            .map(|e| e.id)
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// Like [`find`](Self::find), but a miss is an `UnresolvedDependency`.
    pub fn require(&self, type_name: &str) -> Result<NodeId> {
        self.find(type_name)
            .ok_or_else(|| TreeError::unresolved(self.origin_path.clone(), type_name))
    }
}

/// Dependency on the first `T` in scope.
pub struct Link<T> {
    target: Option<NodeId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self {
            target: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Link<T> {}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Link").field(&self.target).finish()
    }
}

impl<T> Link<T> {
    pub fn id(&self) -> Option<NodeId> {
        self.target
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub fn get<'t>(&self, tree: &'t Tree) -> Option<&'t T>
    where
        T: Model + 'static,
    {
        self.target.and_then(|id| tree.downcast::<T>(id))
    }
}

impl<T: ModelType> Link<T> {
    pub fn resolve(&mut self, scope: &Scope) -> Result<NodeId> {
        let id = scope.require(T::TYPE.name)?;
        self.target = Some(id);
        Ok(id)
    }

    /// Resolves if possible; a miss clears the link.
    pub fn resolve_optional(&mut self, scope: &Scope) -> Option<NodeId> {
        self.target = scope.find(T::TYPE.name);
        self.target
    }
}

impl Tree {
    /// Resolves links of `id` and then of every descendant, pre-order.
    pub fn resolve_links(&mut self, id: NodeId) -> Result<()> {
        let scope = self.scope(id)?;
        self.model_mut(id)?.resolve_links(&scope)?;
        tracing::debug!(node = scope.origin_path(), "Resolved links");

        let children = self.children(id)?.to_vec();
        for child in children {
            self.set_parent(child, Some(id))?;
            self.resolve_links(child)?;
        }
        Ok(())
    }
}
