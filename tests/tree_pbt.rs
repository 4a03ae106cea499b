use canopy_core::containers::{Folder, Simulation, Simulations, Zone};
use canopy_core::{NodeId, Tree};
use indexmap::IndexSet;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Kind {
    Zone,
    Folder,
}

// Each step attaches a new node under an earlier one, picked by index.
prop_compose! {
    fn arb_step()(parent in any::<prop::sample::Index>(), zone in any::<bool>()) -> (prop::sample::Index, Kind) {
        (parent, if zone { Kind::Zone } else { Kind::Folder })
    }
}

prop_compose! {
    fn arb_shape()(
        simulations in 1usize..4,
        steps in prop::collection::vec(arb_step(), 0..40)
    ) -> (usize, Vec<(prop::sample::Index, Kind)>) {
        (simulations, steps)
    }
}

struct Built {
    tree: Tree,
    root: NodeId,
    sims: Vec<NodeId>,
    nodes: Vec<NodeId>,
}

fn build(simulations: usize, steps: &[(prop::sample::Index, Kind)]) -> Built {
    let mut tree = Tree::new();
    let root = tree.insert("Simulations", Simulations::default());
    let mut sims = Vec::new();
    for i in 0..simulations {
        sims.push(
            tree.add_new(root, format!("Sim{i}"), Simulation::default(), false)
                .unwrap(),
        );
    }

    let mut nodes = sims.clone();
    for (n, (parent, kind)) in steps.iter().enumerate() {
        let parent = nodes[parent.index(nodes.len())];
        let id = match kind {
            Kind::Zone => tree.add_new(parent, format!("Z{n}"), Zone::default(), false),
            Kind::Folder => tree.add_new(parent, format!("F{n}"), Folder::default(), false),
        }
        .unwrap();
        nodes.push(id);
    }
    Built {
        tree,
        root,
        sims,
        nodes,
    }
}

fn simulation_of(built: &Built, id: NodeId) -> Option<NodeId> {
    built
        .sims
        .iter()
        .copied()
        .find(|&sim| sim == id || built.tree.ancestors(id).unwrap().contains(&sim))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_full_path_extends_parent_path((simulations, steps) in arb_shape()) {
        let built = build(simulations, &steps);
        for &id in &built.nodes {
            let parent = built.tree.parent(id).unwrap().unwrap();
            let expected = format!(
                "{}.{}",
                built.tree.full_path(parent).unwrap(),
                built.tree.name(id).unwrap()
            );
            prop_assert_eq!(built.tree.full_path(id).unwrap(), expected);
        }
    }

    #[test]
    fn prop_find_all_is_unique_and_typed((simulations, steps) in arb_shape()) {
        let built = build(simulations, &steps);
        for &id in &built.nodes {
            let all = built.tree.find_all(id, None).unwrap();
            let unique: IndexSet<_> = all.iter().collect();
            prop_assert_eq!(unique.len(), all.len());
            prop_assert_eq!(all.last().copied(), Some(built.root));

            for found in built.tree.find_all(id, Some("Zone")).unwrap() {
                prop_assert!(built.tree.type_info(found).unwrap().is("Zone"));
            }
            let zones = built.tree.find_all(id, Some("Zone")).unwrap();
            prop_assert!(zones.contains(&built.tree.zone_of(id).unwrap()));
        }
    }

    #[test]
    fn prop_simulations_are_isolated((simulations, steps) in arb_shape()) {
        let built = build(simulations, &steps);
        for &id in &built.nodes {
            let home = simulation_of(&built, id);
            for found in built.tree.find_all(id, None).unwrap() {
                if let Some(other) = simulation_of(&built, found) {
                    prop_assert_eq!(Some(other), home);
                }
            }
        }
    }

    #[test]
    fn prop_add_then_remove_restores_children(
        (simulations, steps) in arb_shape(),
        pick in any::<prop::sample::Index>()
    ) {
        let mut built = build(simulations, &steps);
        let parent = built.nodes[pick.index(built.nodes.len())];
        let before = built.tree.children(parent).unwrap().to_vec();

        let extra = built.tree.add_new(parent, "Extra", Folder::default(), false).unwrap();
        prop_assert_eq!(built.tree.children(parent).unwrap().last().copied(), Some(extra));
        prop_assert!(built.tree.remove(parent, extra).unwrap());
        prop_assert_eq!(built.tree.children(parent).unwrap(), before.as_slice());
    }
}
