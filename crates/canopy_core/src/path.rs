//! Dotted path addressing: `get` and `set`.
//!
//! ```text
//! [.Simulations][.[TypeName]]segment(.segment)*
//! ```
//!
//! Segments walk child slots by name first and fall back to the current
//! node's properties. Once a segment lands on a plain value, the rest of the
//! path indexes into it (object keys, or array positions for numeric
//! segments).

use crate::error::{Result, TreeError};
use crate::node::{NodeId, Target};
use crate::tree::Tree;
use crate::types::TypeResolver;
use serde_json::Value;

fn lookup_value(value: &Value, segment: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(segment).cloned(),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .cloned(),
        _ => None,
    }
}

impl Tree {
    /// Resolves `path` relative to `from`.
    ///
    /// Returns `Ok(None)` as soon as any segment is missing or null. Only an
    /// unresolvable `[TypeName]` segment or a stale handle is an error.
    pub fn get(
        &self,
        from: NodeId,
        path: &str,
        types: &dyn TypeResolver,
    ) -> Result<Option<Target>> {
        let mut current = from;
        let mut rest = path;

        let prefix = self.config().root_prefix();
        if let Some(stripped) = rest.strip_prefix(prefix.as_str()) {
            if stripped.is_empty() || stripped.starts_with('.') {
                current = self.root(from)?;
                rest = stripped;
            }
        }

        let trimmed = rest.trim_start_matches('.');
        if let Some(bracketed) = trimmed.strip_prefix('[') {
            let Some((name, after)) = bracketed.split_once(']') else {
                return Err(TreeError::unknown_type(bracketed, "missing closing bracket"));
            };
            let Some(info) = types.resolve(name) else {
                return Err(TreeError::unknown_type(name, "no such type is registered"));
            };
            current = match self.find(current, info.name)? {
                Some(found) => found,
                None => {
                    return Err(TreeError::unknown_type(
                        name,
                        format!("nothing of this type is in scope of {}", self.full_path(current)?),
                    ))
                }
            };
            rest = after;
        }

        let mut target = Target::Node(current);
        for segment in rest.split('.').filter(|s| !s.is_empty()) {
            let next = match &target {
                Target::Node(id) => match self.child(*id, segment)? {
                    Some(child) => Some(Target::Node(child)),
                    None => self.model(*id)?.property(segment),
                },
                Target::Value(value) => lookup_value(value, segment).map(Target::Value),
            };
            match next {
                None | Some(Target::Value(Value::Null)) => return Ok(None),
                Some(next) => target = next,
            }
        }
        Ok(Some(target))
    }

    /// Sets the property named by the last segment of `path` on the node the
    /// rest of the path resolves to.
    pub fn set(
        &mut self,
        from: NodeId,
        path: &str,
        value: Value,
        types: &dyn TypeResolver,
    ) -> Result<()> {
        let (head, property) = path.rsplit_once('.').unwrap_or(("", path));

        let owner = if head.is_empty() {
            from
        } else {
            match self.get(from, head, types)? {
                Some(Target::Node(id)) => id,
                _ => return Err(TreeError::unknown_property(self.full_path(from)?, path)),
            }
        };

        let owner_path = self.full_path(owner)?;
        self.model_mut(owner)?
            .set_property(property, value)
            .map_err(|e| e.at(owner_path.clone(), property))?;
        tracing::debug!(node = %owner_path, property, "Set property");
        Ok(())
    }
}
