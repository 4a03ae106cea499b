//! Stock container types: the top-level `Simulations` root, the
//! `Simulation` and `Zone` scope boundaries, and plain `Folder`s.

use crate::error::PropertyError;
use crate::node::{assign, properties_of, Children, Model};
use crate::slots;
use crate::types::{ModelType, TypeInfo};
use serde::Serialize;
use serde_json::{Map, Value};

/// Top-level container. Its `Simulation` children never see each other.
#[derive(Debug, Default)]
pub struct Simulations {
    children: Children,
}

impl ModelType for Simulations {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Simulations", &[]);
}

impl Model for Simulations {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        children: List("Model"),
    }
}

/// One independent run. A `Simulation` is also a `Zone`.
#[derive(Debug, Default)]
pub struct Simulation {
    children: Children,
}

impl ModelType for Simulation {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Simulation", &["Zone"]);
}

impl Model for Simulation {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        children: List("Model"),
    }
}

/// A spatial unit (paddock, field) bounding lookup scope.
#[derive(Debug, Default, Serialize)]
pub struct Zone {
    /// Area in hectares.
    pub area: f64,
    #[serde(skip)]
    children: Children,
}

impl ModelType for Zone {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Zone", &[]);
}

impl Model for Zone {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        children: List("Model"),
    }

    fn properties(&self) -> Map<String, Value> {
        properties_of(self)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "area" => assign(&mut self.area, value),
            _ => Err(PropertyError::Unknown),
        }
    }
}

/// Grouping node with no effect on scope.
#[derive(Debug, Default)]
pub struct Folder {
    children: Children,
}

impl ModelType for Folder {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Folder", &[]);
}

impl Model for Folder {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        children: List("Model"),
    }
}
