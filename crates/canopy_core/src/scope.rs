//! Scoped lookup.
//!
//! A node sees everything under its nearest enclosing zone, then the zone
//! itself, then, walking up, each ancestor's direct children followed by the
//! ancestor. At the top-level container, sibling simulations are skipped so
//! that lookups never cross from one run into another.

use crate::error::Result;
use crate::links::{Scope, ScopeEntry};
use crate::node::NodeId;
use crate::tree::Tree;
use crate::types::ModelType;
use indexmap::IndexSet;

impl Tree {
    pub fn is_zone(&self, id: NodeId) -> Result<bool> {
        Ok(self.type_info(id)?.is(&self.config().scope.zone_type))
    }

    /// Nearest zone boundary at or above `id`; the topmost ancestor when
    /// there is none.
    pub fn zone_of(&self, id: NodeId) -> Result<NodeId> {
        if self.is_zone(id)? {
            return Ok(id);
        }
        for ancestor in self.ancestors(id)? {
            if self.is_zone(ancestor)? {
                return Ok(ancestor);
            }
        }
        self.root(id)
    }

    /// Every node visible from `from`, optionally filtered to those
    /// assignable to `type_name`. Ordered and free of duplicates.
    pub fn find_all(&self, from: NodeId, type_name: Option<&str>) -> Result<Vec<NodeId>> {
        let scope = &self.config().scope;
        let zone = self.zone_of(from)?;

        let mut visible: IndexSet<NodeId> = IndexSet::new();
        visible.extend(self.descendants(zone)?);
        visible.insert(zone);

        for ancestor in self.ancestors(zone)? {
            let at_root = self.type_info(ancestor)?.is(&scope.root_type);
            for &child in self.children(ancestor)? {
                if at_root && self.type_info(child)?.is(&scope.simulation_type) {
                    continue;
                }
                visible.insert(child);
            }
            visible.insert(ancestor);
        }

        match type_name {
            None => Ok(visible.into_iter().collect()),
            Some(type_name) => {
                let mut out = Vec::new();
                for id in visible {
                    if self.type_info(id)?.is(type_name) {
                        out.push(id);
                    }
                }
                Ok(out)
            }
        }
    }

    pub fn find(&self, from: NodeId, type_name: &str) -> Result<Option<NodeId>> {
        Ok(self.find_all(from, Some(type_name))?.first().copied())
    }

    pub fn find_by_name(&self, from: NodeId, name: &str) -> Result<Option<NodeId>> {
        for id in self.find_all(from, None)? {
            if self.name(id)? == name {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    pub fn find_of<T: ModelType>(&self, from: NodeId) -> Result<Option<NodeId>> {
        self.find(from, T::TYPE.name)
    }

    pub fn find_all_of<T: ModelType>(&self, from: NodeId) -> Result<Vec<NodeId>> {
        self.find_all(from, Some(T::TYPE.name))
    }

    /// Materializes the visibility set of `from`.
    pub fn scope(&self, from: NodeId) -> Result<Scope> {
        let mut entries = Vec::new();
        for id in self.find_all(from, None)? {
            entries.push(ScopeEntry {
                id,
                name: self.name(id)?.to_string(),
                type_info: self.type_info(id)?,
            });
        }
        Ok(Scope::new(from, self.full_path(from)?, entries))
    }
}
