//! # Canopy
//!
//! Composition trees of simulation models, wired by scoped dependency links,
//! with script components that can be recompiled in place.
//!
//! The engine lives in [`canopy_core`] and [`canopy_script`]; this crate adds
//! the stock models, the standard type registry and application config.

pub mod model;

pub use canopy_core;
pub use canopy_script;
