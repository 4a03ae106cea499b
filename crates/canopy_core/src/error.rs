//! Error types for canopy_core.
//!
//! Every variant that concerns a node in the tree carries the node's full
//! path, which is the identity hosts use to report problems to users.

use crate::node::NodeId;
use thiserror::Error;

/// Main error type for tree operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// No slot on the parent accepts the child's type
    #[error("Unable to add {child} to {path}: no compatible slot")]
    SlotNotFound { path: String, child: String },

    /// A declared dependency could not be found in scope
    #[error("Unable to resolve link in {path}: no {type_name} in scope")]
    UnresolvedDependency { path: String, type_name: String },

    /// A bracketed type name in a path could not be resolved
    #[error("Unknown type name [{name}]: {detail}")]
    UnknownTypeName { name: String, detail: String },

    /// A handle refers to a deleted or never-allocated node
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The child is already placed under another node
    #[error("{child} is already attached under {path}")]
    AlreadyAttached { path: String, child: String },

    /// The placement would make a node its own ancestor
    #[error("Adding {child} under {path} would create a cycle")]
    Cycle { path: String, child: String },

    /// The operation requires a detached node
    #[error("{path} is still attached to a parent")]
    Attached { path: String },

    /// A settable property with this name does not exist
    #[error("{path} has no settable property '{property}'")]
    UnknownProperty { path: String, property: String },

    /// The value is not acceptable for the property
    #[error("Invalid value for {path}.{property}: {reason}")]
    InvalidValue {
        path: String,
        property: String,
        reason: String,
    },
}

/// Result type alias for canopy_core operations.
pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
    /// Creates a new slot-not-found error.
    #[must_use]
    pub fn slot_not_found<P: Into<String>, C: Into<String>>(path: P, child: C) -> Self {
        Self::SlotNotFound {
            path: path.into(),
            child: child.into(),
        }
    }

    /// Creates a new unresolved-dependency error.
    #[must_use]
    pub fn unresolved<P: Into<String>, T: Into<String>>(path: P, type_name: T) -> Self {
        Self::UnresolvedDependency {
            path: path.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new unknown-type-name error.
    #[must_use]
    pub fn unknown_type<N: Into<String>, D: Into<String>>(name: N, detail: D) -> Self {
        Self::UnknownTypeName {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Creates a new unknown-property error.
    #[must_use]
    pub fn unknown_property<P: Into<String>, N: Into<String>>(path: P, property: N) -> Self {
        Self::UnknownProperty {
            path: path.into(),
            property: property.into(),
        }
    }
}

/// Failure reported by [`Model::set_property`](crate::Model::set_property).
///
/// The tree attaches the node path when converting it into a [`TreeError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("unknown property")]
    Unknown,
    #[error("{0}")]
    Invalid(String),
}

impl PropertyError {
    /// Creates a new invalid-value error.
    #[must_use]
    pub fn invalid<S: Into<String>>(reason: S) -> Self {
        Self::Invalid(reason.into())
    }

    pub(crate) fn at(self, path: String, property: &str) -> TreeError {
        match self {
            Self::Unknown => TreeError::unknown_property(path, property),
            Self::Invalid(reason) => TreeError::InvalidValue {
                path,
                property: property.to_string(),
                reason,
            },
        }
    }
}
