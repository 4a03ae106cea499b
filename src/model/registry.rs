//! The standard set of node types.

use super::{Clock, Crop, Report, Soil, Water, Weather};
use canopy_core::containers::{Folder, Simulation, Simulations, Zone};
use canopy_core::TypeRegistry;
use canopy_script::{ScriptHost, SCRIPT_TYPE};

/// Registry of every stock type, for `[TypeName]` paths and factories.
pub fn standard_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<Simulations>()
        .register::<Simulation>()
        .register::<Zone>()
        .register::<Folder>()
        .register::<Clock>()
        .register::<Weather>()
        .register::<Soil>()
        .register::<Water>()
        .register::<Crop>()
        .register::<Report>()
        .register::<ScriptHost>()
        .register_info(&SCRIPT_TYPE);
    registry
}
