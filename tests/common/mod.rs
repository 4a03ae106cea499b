pub mod macros;

use canopy_core::containers::{Simulation, Simulations, Zone};
use canopy_core::{CoreConfig, NodeId, Tree, TypeRegistry};
use canopy_lib::model::{standard_registry, Clock, Crop, Report, Soil, Water, Weather};
use chrono::NaiveDate;

/// Handles into the tree built by [`FarmBuilder`].
///
/// ```text
/// Simulations
///   Sim1: Clock, Weather, Field1 (Soil > Water, Wheat, Report), Field2
///   Sim2: Clock, Weather, Field1 (Wheat)
/// ```
#[allow(dead_code)]
pub struct Farm {
    pub tree: Tree,
    pub types: TypeRegistry,
    pub root: NodeId,
    pub sim1: NodeId,
    pub clock: Option<NodeId>,
    pub weather: NodeId,
    pub field1: NodeId,
    pub soil: NodeId,
    pub water: NodeId,
    pub wheat: NodeId,
    pub report: NodeId,
    pub field2: NodeId,
    pub sim2: NodeId,
    pub wheat2: NodeId,
}

#[allow(dead_code)]
pub struct FarmBuilder {
    config: CoreConfig,
    with_clock: bool,
    resolve: bool,
    report_variables: Vec<String>,
}

#[allow(dead_code)]
impl FarmBuilder {
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
            with_clock: true,
            resolve: false,
            report_variables: Vec::new(),
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut CoreConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Leaves Sim1 without a clock, so its links cannot resolve.
    pub fn without_clock(mut self) -> Self {
        self.with_clock = false;
        self
    }

    /// Runs link resolution over the whole tree after building.
    pub fn resolved(mut self) -> Self {
        self.resolve = true;
        self
    }

    pub fn with_report_variable(mut self, path: &str) -> Self {
        self.report_variables.push(path.to_string());
        self
    }

    pub fn build(self) -> Farm {
        let mut tree = Tree::with_config(self.config);
        let root = tree.insert("Simulations", Simulations::default());

        let sim1 = tree
            .add_new(root, "Sim1", Simulation::default(), false)
            .expect("Failed to add Sim1");
        let clock = self.with_clock.then(|| {
            tree.add_new(sim1, "Clock", default_clock(), false)
                .expect("Failed to add clock")
        });
        let weather = tree
            .add_new(sim1, "Weather", Weather::new(25.0, 10.0, 4.0, 20.0), false)
            .expect("Failed to add weather");
        let field1 = tree
            .add_new(sim1, "Field1", Zone::default(), false)
            .expect("Failed to add Field1");
        let soil = tree
            .add_new(field1, "Soil", Soil::new(vec![150.0, 300.0]), false)
            .expect("Failed to add soil");
        let water = tree
            .add_new(
                soil,
                "Water",
                Water {
                    sw: vec![0.3, 0.25],
                },
                false,
            )
            .expect("Failed to add water");
        let wheat = tree
            .add_new(field1, "Wheat", Crop::new("wheat"), false)
            .expect("Failed to add wheat");
        let report = tree
            .add_new(field1, "Report", Report::new(self.report_variables), false)
            .expect("Failed to add report");
        let field2 = tree
            .add_new(sim1, "Field2", Zone::default(), false)
            .expect("Failed to add Field2");

        let sim2 = tree
            .add_new(root, "Sim2", Simulation::default(), false)
            .expect("Failed to add Sim2");
        tree.add_new(sim2, "Clock", default_clock(), false)
            .expect("Failed to add clock");
        tree.add_new(sim2, "Weather", Weather::new(30.0, 18.0, 0.0, 26.0), false)
            .expect("Failed to add weather");
        let field = tree
            .add_new(sim2, "Field1", Zone::default(), false)
            .expect("Failed to add Field1");
        let wheat2 = tree
            .add_new(field, "Wheat", Crop::new("barley"), false)
            .expect("Failed to add wheat");

        if self.resolve {
            tree.resolve_links(root).expect("Failed to resolve links");
        }

        Farm {
            tree,
            types: standard_registry(),
            root,
            sim1,
            clock,
            weather,
            field1,
            soil,
            water,
            wheat,
            report,
            field2,
            sim2,
            wheat2,
        }
    }
}

fn default_clock() -> Clock {
    Clock::new(
        NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2000, 12, 31).expect("valid date"),
    )
}
