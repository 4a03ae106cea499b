//! Soil profile.

use super::water::Water;
use canopy_core::{
    assign, properties_of, slots, Child, Children, Model, ModelType, PropertyError, Tree, TypeInfo,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Layered soil. Holds at most one [`Water`] model plus any other children.
#[derive(Debug, Default, Serialize)]
pub struct Soil {
    /// Layer thickness (mm), top down.
    #[serde(rename = "Thickness")]
    pub thickness: Vec<f64>,
    #[serde(skip)]
    water: Child,
    #[serde(skip)]
    children: Children,
}

impl Soil {
    pub fn new(thickness: Vec<f64>) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    pub fn depth(&self) -> f64 {
        self.thickness.iter().sum()
    }

    pub fn water<'t>(&self, tree: &'t Tree) -> Option<&'t Water> {
        self.water.get().and_then(|id| tree.downcast::<Water>(id))
    }

    /// Total profile water (mm), if a water model is attached.
    pub fn total_water(&self, tree: &Tree) -> Option<f64> {
        self.water(tree).map(|w| w.total(&self.thickness))
    }
}

impl ModelType for Soil {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Soil", &[]);
}

impl Model for Soil {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        water: Single("Water"),
        children: List("Model"),
    }

    fn properties(&self) -> Map<String, Value> {
        let mut map = properties_of(self);
        map.insert("Depth".to_string(), Value::from(self.depth()));
        map
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "Thickness" => assign(&mut self.thickness, value),
            _ => Err(PropertyError::Unknown),
        }
    }
}
