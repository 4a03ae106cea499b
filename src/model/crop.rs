//! A simple radiation-use crop.

use super::clock::Clock;
use super::soil::Soil;
use super::weather::Weather;
use canopy_core::{
    assign, properties_of, slots, Children, Link, Model, ModelType, PropertyError, Scope, Target,
    Tree, TypeInfo,
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Crop {
    pub crop_type: String,
    pub sown: bool,
    /// Above-ground biomass (g/m²).
    pub biomass: f64,
    /// Radiation use efficiency (g/MJ).
    pub rue: f64,
    #[serde(skip)]
    clock: Link<Clock>,
    #[serde(skip)]
    weather: Link<Weather>,
    #[serde(skip)]
    soil: Link<Soil>,
    #[serde(skip)]
    organs: Children,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            crop_type: "wheat".to_string(),
            sown: false,
            biomass: 0.0,
            rue: 1.2,
            clock: Link::default(),
            weather: Link::default(),
            soil: Link::default(),
            organs: Children::default(),
        }
    }
}

impl Crop {
    pub fn new(crop_type: impl Into<String>) -> Self {
        Self {
            crop_type: crop_type.into(),
            ..Self::default()
        }
    }

    pub fn clock(&self) -> Link<Clock> {
        self.clock
    }

    pub fn weather(&self) -> Link<Weather> {
        self.weather
    }

    pub fn soil(&self) -> Link<Soil> {
        self.soil
    }

    /// Today's biomass increment from intercepted radiation.
    pub fn potential_growth(&self, tree: &Tree) -> f64 {
        if !self.sown {
            return 0.0;
        }
        self.weather
            .get(tree)
            .map_or(0.0, |weather| weather.radn * self.rue)
    }
}

impl ModelType for Crop {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Crop", &[]);
}

impl Model for Crop {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    slots! {
        organs: List("Model"),
    }

    fn properties(&self) -> Map<String, Value> {
        properties_of(self)
    }

    fn property(&self, name: &str) -> Option<Target> {
        match name {
            "Clock" => self.clock.id().map(Target::Node),
            "Weather" => self.weather.id().map(Target::Node),
            "Soil" => self.soil.id().map(Target::Node),
            _ => self.properties().remove(name).map(Target::Value),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "CropType" => assign(&mut self.crop_type, value),
            "Sown" => assign(&mut self.sown, value),
            "Biomass" => assign(&mut self.biomass, value),
            "Rue" => assign(&mut self.rue, value),
            _ => Err(PropertyError::Unknown),
        }
    }

    fn resolve_links(&mut self, scope: &Scope) -> canopy_core::Result<()> {
        self.clock.resolve(scope)?;
        self.weather.resolve(scope)?;
        self.soil.resolve_optional(scope);
        Ok(())
    }
}
