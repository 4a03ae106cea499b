//! Daily weather drivers.

use super::clock::Clock;
use canopy_core::{assign, properties_of, Link, Model, ModelType, PropertyError, Scope, Target, TypeInfo};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Weather {
    /// Maximum temperature (°C).
    pub max_t: f64,
    /// Minimum temperature (°C).
    pub min_t: f64,
    /// Rainfall (mm).
    pub rain: f64,
    /// Solar radiation (MJ/m²).
    pub radn: f64,
    #[serde(skip)]
    clock: Link<Clock>,
}

impl Weather {
    pub fn new(max_t: f64, min_t: f64, rain: f64, radn: f64) -> Self {
        Self {
            max_t,
            min_t,
            rain,
            radn,
            clock: Link::default(),
        }
    }

    pub fn mean_t(&self) -> f64 {
        (self.max_t + self.min_t) / 2.0
    }

    pub fn clock(&self) -> Link<Clock> {
        self.clock
    }
}

impl ModelType for Weather {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Weather", &[]);
}

impl Model for Weather {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    fn properties(&self) -> Map<String, Value> {
        let mut map = properties_of(self);
        map.insert("MeanT".to_string(), Value::from(self.mean_t()));
        map
    }

    fn property(&self, name: &str) -> Option<Target> {
        match name {
            "Clock" => self.clock.id().map(Target::Node),
            _ => self.properties().remove(name).map(Target::Value),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "MaxT" => assign(&mut self.max_t, value),
            "MinT" => assign(&mut self.min_t, value),
            "Rain" => assign(&mut self.rain, value),
            "Radn" => assign(&mut self.radn, value),
            _ => Err(PropertyError::Unknown),
        }
    }

    fn resolve_links(&mut self, scope: &Scope) -> canopy_core::Result<()> {
        self.clock.resolve(scope)?;
        Ok(())
    }
}
