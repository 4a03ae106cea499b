//! Arena that owns every node and implements the mutation API.
//!
//! Nodes are addressed by generational [`NodeId`] handles. A node's parent is
//! a plain handle; its children are whatever its slots currently hold, read
//! through the slot descriptor table and cached per node. `add` and `remove`
//! are the only operations that change slot contents, and both invalidate the
//! cache of the node they touch.

use crate::config::CoreConfig;
use crate::error::{Result, TreeError};
use crate::node::{Model, NodeId, SlotKind, SlotMut};
use crate::types::TypeInfo;
use std::cell::OnceCell;

struct NodeEntry {
    name: String,
    parent: Option<NodeId>,
    model: Box<dyn Model>,
    children: OnceCell<Vec<NodeId>>,
}

struct Entry {
    generation: u32,
    node: Option<NodeEntry>,
}

/// Owner of a forest of composition trees.
pub struct Tree {
    entries: Vec<Entry>,
    free: Vec<u32>,
    config: CoreConfig,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a detached node.
    pub fn insert<M: Model + 'static>(&mut self, name: impl Into<String>, model: M) -> NodeId {
        self.insert_boxed(name, Box::new(model))
    }

    pub fn insert_boxed(&mut self, name: impl Into<String>, model: Box<dyn Model>) -> NodeId {
        let node = NodeEntry {
            name: name.into(),
            parent: None,
            model,
            children: OnceCell::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.node = Some(node);
                NodeId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry> {
        self.entries
            .get(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.node.as_ref())
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.node.as_mut())
            .ok_or(TreeError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_ok()
    }

    pub fn name(&self, id: NodeId) -> Result<&str> {
        Ok(&self.entry(id)?.name)
    }

    /// Renames a node. Paths are derived, so nothing else changes.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.entry_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.entry(id)?.parent)
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.entry_mut(id)?.parent = parent;
        Ok(())
    }

    pub fn type_info(&self, id: NodeId) -> Result<&'static TypeInfo> {
        Ok(self.entry(id)?.model.type_info())
    }

    pub fn model(&self, id: NodeId) -> Result<&dyn Model> {
        Ok(self.entry(id)?.model.as_ref())
    }

    /// Mutable access to a node's model.
    ///
    /// Slot handles cannot be changed through this; use `add`/`remove`.
    pub fn model_mut(&mut self, id: NodeId) -> Result<&mut dyn Model> {
        Ok(self.entry_mut(id)?.model.as_mut())
    }

    pub fn downcast<T: Model + 'static>(&self, id: NodeId) -> Option<&T> {
        let model: &dyn Model = self.entry(id).ok()?.model.as_ref();
        model.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Model + 'static>(&mut self, id: NodeId) -> Option<&mut T> {
        let model: &mut dyn Model = self.entry_mut(id).ok()?.model.as_mut();
        model.as_any_mut().downcast_mut::<T>()
    }

    /// Children in slot declaration order, cached until the next mutation.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        let entry = self.entry(id)?;
        let children = entry.children.get_or_init(|| {
            let model = entry.model.as_ref();
            let mut out = Vec::new();
            for index in 0..model.slots().len() {
                if let Some(slot) = model.slot(index) {
                    slot.collect_into(&mut out);
                }
            }
            out
        });
        Ok(children.as_slice())
    }

    /// First child with exactly this name.
    pub fn child(&self, id: NodeId, name: &str) -> Result<Option<NodeId>> {
        for &child in self.children(id)? {
            if self.name(child)? == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// All descendants in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out)?;
        Ok(out)
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) -> Result<()> {
        for &child in self.children(id)? {
            out.push(child);
            self.collect_descendants(child, out)?;
        }
        Ok(())
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut current = self.parent(id)?;
        while let Some(parent) = current.filter(|&p| self.contains(p)) {
            out.push(parent);
            current = self.parent(parent)?;
        }
        Ok(out)
    }

    /// Nearest strict ancestor assignable to `type_name`.
    pub fn ancestor(&self, id: NodeId, type_name: &str) -> Result<Option<NodeId>> {
        for ancestor in self.ancestors(id)? {
            if self.type_info(ancestor)?.is(type_name) {
                return Ok(Some(ancestor));
            }
        }
        Ok(None)
    }

    /// Topmost ancestor, or `id` itself when detached.
    pub fn root(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.ancestors(id)?.last().copied().unwrap_or(id))
    }

    /// `.Root.Child.Grandchild`, recomputed on every call.
    pub fn full_path(&self, id: NodeId) -> Result<String> {
        let mut names = vec![self.name(id)?];
        for ancestor in self.ancestors(id)? {
            names.push(self.name(ancestor)?);
        }
        let mut path = String::new();
        for name in names.iter().rev() {
            path.push('.');
            path.push_str(name);
        }
        Ok(path)
    }

    fn path_or_handle(&self, id: NodeId) -> String {
        self.full_path(id).unwrap_or_else(|_| id.to_string())
    }

    fn invalidate(&mut self, id: NodeId) -> Result<()> {
        if self.entry_mut(id)?.children.take().is_some() {
            tracing::debug!(node = %id, "Invalidated child cache");
        }
        Ok(())
    }

    /// Index of the slot in `parent` that holds `child`, if any.
    fn slot_holding(&self, parent: NodeId, child: NodeId) -> Result<Option<usize>> {
        let model = self.entry(parent)?.model.as_ref();
        Ok((0..model.slots().len())
            .find(|&index| model.slot(index).is_some_and(|slot| slot.contains(child))))
    }

    /// First single slot declared with exactly this type, else the first
    /// list slot accepting it.
    fn compatible_slot(&self, parent: NodeId, child_type: &TypeInfo) -> Result<Option<usize>> {
        let slots = self.entry(parent)?.model.slots();
        Ok(slots
            .iter()
            .position(|decl| decl.kind == SlotKind::Single && decl.accepts == child_type.name)
            .or_else(|| {
                slots
                    .iter()
                    .position(|decl| decl.kind == SlotKind::List && child_type.is(decl.accepts))
            }))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> Result<bool> {
        Ok(candidate == id || self.ancestors(id)?.contains(&candidate))
    }

    /// Places `child` into the first compatible slot of `parent`.
    pub fn add(&mut self, parent: NodeId, child: NodeId, resolve_links: bool) -> Result<()> {
        self.entry(parent)?;
        if let Some(current) = self.parent(child)? {
            if self.contains(current) && self.slot_holding(current, child)?.is_some() {
                return Err(TreeError::AlreadyAttached {
                    path: self.path_or_handle(current),
                    child: self.name(child)?.to_string(),
                });
            }
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(TreeError::Cycle {
                path: self.full_path(parent)?,
                child: self.name(child)?.to_string(),
            });
        }

        if self.config.mutation.parent_before_placement {
            self.set_parent(child, Some(parent))?;
        }

        let child_type = self.type_info(child)?;
        let Some(index) = self.compatible_slot(parent, child_type)? else {
            return Err(TreeError::slot_not_found(
                self.full_path(parent)?,
                self.name(child)?,
            ));
        };

        let placed = match self.entry_mut(parent)?.model.slot_mut(index) {
            Some(SlotMut::Single(slot)) => Some(slot.replace(child)),
            Some(SlotMut::List(slot)) => {
                slot.push(child);
                Some(None)
            }
            None => None,
        };
        // a declared slot without an accessor cannot hold anything
        let Some(displaced) = placed else {
            return Err(TreeError::slot_not_found(
                self.full_path(parent)?,
                self.name(child)?,
            ));
        };
        if let Some(previous) = displaced.filter(|&previous| previous != child) {
            tracing::warn!(
                parent = %self.path_or_handle(parent),
                previous = %self.path_or_handle(previous),
                "Replacing occupied slot"
            );
            if self.contains(previous) {
                self.set_parent(previous, None)?;
            }
        }

        self.set_parent(child, Some(parent))?;
        self.invalidate(parent)?;
        tracing::debug!(
            parent = %self.path_or_handle(parent),
            child = self.name(child)?,
            slot = self.entry(parent)?.model.slots()[index].name,
            "Added child"
        );

        if resolve_links {
            self.resolve_links(child)?;
        }
        Ok(())
    }

    /// Inserts a new node and adds it under `parent`.
    ///
    /// If placement fails the new node is freed again.
    pub fn add_new<M: Model + 'static>(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        model: M,
        resolve_links: bool,
    ) -> Result<NodeId> {
        let child = self.insert(name, model);
        if let Err(e) = self.add(parent, child, resolve_links) {
            // a link failure leaves the child placed
            if self.slot_holding(parent, child)?.is_none() {
                self.free_subtree(child)?;
            }
            return Err(e);
        }
        Ok(child)
    }

    /// Removes `child` from whichever slot of `parent` holds it.
    ///
    /// Returns `false` if no slot held it. The child stays alive as a
    /// detached root.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        self.invalidate(parent)?;
        let model = self.entry_mut(parent)?.model.as_mut();
        let mut found = false;
        for index in 0..model.slots().len() {
            found = match model.slot_mut(index) {
                Some(SlotMut::Single(slot)) => slot.clear_if(child),
                Some(SlotMut::List(slot)) => slot.remove(child),
                None => false,
            };
            if found {
                break;
            }
        }
        if found && self.parent(child).ok().flatten() == Some(parent) {
            self.set_parent(child, None)?;
        }
        tracing::debug!(parent = %parent, child = %child, found, "Removed child");
        Ok(found)
    }

    /// Removes a node from its current parent, if any.
    pub fn detach(&mut self, id: NodeId) -> Result<bool> {
        match self.parent(id)? {
            Some(parent) if self.contains(parent) => self.remove(parent, id),
            Some(_) => {
                self.set_parent(id, None)?;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn is_placed(&self, id: NodeId) -> Result<bool> {
        match self.parent(id)? {
            Some(parent) if self.contains(parent) => Ok(self.slot_holding(parent, id)?.is_some()),
            _ => Ok(false),
        }
    }

    /// Frees a detached node and its whole subtree, returning how many
    /// nodes were dropped.
    pub fn delete(&mut self, id: NodeId) -> Result<usize> {
        if self.is_placed(id)? {
            return Err(TreeError::Attached {
                path: self.full_path(id)?,
            });
        }
        self.free_subtree(id)
    }

    fn free_subtree(&mut self, id: NodeId) -> Result<usize> {
        let mut doomed = self.descendants(id)?;
        doomed.push(id);
        for node in &doomed {
            let entry = &mut self.entries[node.index as usize];
            entry.node = None;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(node.index);
        }
        Ok(doomed.len())
    }
}
