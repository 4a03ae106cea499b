//! Simulation calendar.

use canopy_core::{assign, properties_of, Model, ModelType, PropertyError, TypeInfo};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Clock {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub today: NaiveDate,
}

impl Clock {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            today: start_date,
        }
    }

    /// Moves to the next day. Returns `false` once past the end date.
    pub fn advance(&mut self) -> bool {
        match self.today.checked_add_days(Days::new(1)) {
            Some(next) if next <= self.end_date => {
                self.today = next;
                true
            }
            _ => false,
        }
    }

    pub fn day_of_year(&self) -> u32 {
        chrono::Datelike::ordinal(&self.today)
    }
}

impl ModelType for Clock {
    const TYPE: &'static TypeInfo = &TypeInfo::new("Clock", &[]);
}

impl Model for Clock {
    fn type_info(&self) -> &'static TypeInfo {
        Self::TYPE
    }

    fn properties(&self) -> Map<String, Value> {
        properties_of(self)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "StartDate" => assign(&mut self.start_date, value),
            "EndDate" => assign(&mut self.end_date, value),
            "Today" => assign(&mut self.today, value),
            _ => Err(PropertyError::Unknown),
        }
    }
}
