//! Stock node types and application configuration.

pub mod clock;
pub mod config;
pub mod crop;
pub mod registry;
pub mod report;
pub mod soil;
pub mod water;
pub mod weather;

pub use clock::Clock;
pub use crop::Crop;
pub use registry::standard_registry;
pub use report::Report;
pub use soil::Soil;
pub use water::Water;
pub use weather::Weather;
