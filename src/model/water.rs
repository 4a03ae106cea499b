//! Soil water by layer.

use canopy_core::{assign, properties_of, Model, ModelType, PropertyError, TypeInfo};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Clone, Serialize)]
pub struct Water {
    /// Volumetric water content per layer (mm/mm).
    #[serde(rename = "SW")]
    pub sw: Vec<f64>,
}

impl Water {
    /// Total water (mm) given each layer's thickness (mm).
    pub fn total(&self, thickness: &[f64]) -> f64 {
        self.sw.iter().zip(thickness).map(|(sw, dz)| sw * dz).sum()
    }
}

impl ModelType for Water {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Water", &[]);
}

impl Model for Water {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    fn properties(&self) -> Map<String, Value> {
        properties_of(self)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "SW" => assign(&mut self.sw, value),
            _ => Err(PropertyError::Unknown),
        }
    }
}
