//! # Canopy Script
//!
//! Nodes whose content is compiled from source text at runtime.
//!
//! - [`ComponentCompiler`] compiles the built-in component language behind
//!   the [`SourceCompiler`] trait
//! - [`ScriptType`] is the compiled schema, [`ScriptInstance`] its node type
//! - [`ScriptHost`] holds source text and one embedded instance
//! - [`ScriptEngine`] rebuilds hosts in place, keeping field values across
//!   source edits, and loads/saves their persisted form
//!
//! ## Example
//!
//! ```
//! use canopy_core::containers::Simulation;
//! use canopy_core::Tree;
//! use canopy_script::ScriptEngine;
//!
//! let mut tree = Tree::new();
//! let sim = tree.insert("Sim1", Simulation::default());
//! let engine = ScriptEngine::default();
//!
//! let host = engine
//!     .create(&mut tree, sim, "Manager", "pub component Script { x: real = 1; }")
//!     .unwrap();
//! engine
//!     .rebuild(&mut tree, host, "pub component Script { x: real = 1; y: int = 2; }")
//!     .unwrap();
//!
//! let instance = ScriptEngine::instance(&tree, host).unwrap().unwrap();
//! assert_eq!(instance.value("y"), Some(&serde_json::json!(2)));
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod host;
pub mod instance;
pub mod parser;
pub mod script_type;
pub mod snapshot;

pub use compiler::{CompiledUnit, ComponentCompiler, SourceCompiler, ENTRY_TYPE};
pub use config::ScriptConfig;
pub use error::{CompileError, Diagnostic, Result, ScriptError};
pub use host::{Rebuild, ScriptEngine, ScriptHost, ScriptRecord};
pub use instance::{ScriptInstance, SCRIPT_TYPE};
pub use script_type::{FieldDecl, FieldKind, LinkDecl, Reconciliation, ScriptType};
pub use snapshot::Snapshot;
