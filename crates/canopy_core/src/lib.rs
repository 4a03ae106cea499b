//! # Canopy Core
//!
//! Hierarchical composition tree with scoped lookup and dependency links.
//!
//! This crate contains:
//! - The node arena ([`Tree`]) with the `add`/`remove` mutation API
//! - Slot declarations for node types ([`slots!`], [`SlotDecl`])
//! - Scoped queries (`find`, `find_all`) bounded by zones and simulations
//! - Dotted path addressing (`get`, `set`)
//! - Link resolution over a subtree ([`Link`], [`Scope`])
//! - Stock containers and the type registry
//!
//! ## Example
//!
//! ```
//! use canopy_core::containers::{Folder, Simulation, Simulations, Zone};
//! use canopy_core::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert("Simulations", Simulations::default());
//! let sim = tree.add_new(root, "Sim1", Simulation::default(), false).unwrap();
//! let field = tree.add_new(sim, "Field1", Zone::default(), false).unwrap();
//! let notes = tree.add_new(field, "Notes", Folder::default(), false).unwrap();
//!
//! assert_eq!(tree.full_path(notes).unwrap(), ".Simulations.Sim1.Field1.Notes");
//! assert_eq!(tree.find(notes, "Zone").unwrap(), Some(field));
//! ```

/// Configuration for scope boundaries, mutation and logging
pub mod config;
/// Stock container node types
pub mod containers;
/// Error types and the crate `Result` alias
pub mod error;
/// Dependency links and materialized scopes
pub mod links;
/// Tracing subscriber setup
pub mod logging;
/// Node handles, the `Model` trait and slot descriptors
pub mod node;
/// Dotted path `get` and `set`
pub mod path;
/// Scoped `find` / `find_all`
pub mod scope;
/// The node arena and mutation API
pub mod tree;
/// Type descriptors and the type registry
pub mod types;

pub use config::CoreConfig;
pub use error::{PropertyError, Result, TreeError};
pub use links::{Link, Scope, ScopeEntry};
pub use logging::init_logging;
pub use node::{
    assign, properties_of, Child, Children, Model, NodeId, SlotDecl, SlotKind, SlotMut, SlotRef,
    Target,
};
pub use tree::Tree;
pub use types::{Factory, ModelType, TypeInfo, TypeRegistry, TypeResolver, MODEL};
