/// Asserts that `get(path)` from `$from` resolves to the given JSON value.
#[macro_export]
macro_rules! assert_value_at {
    ($farm:expr, $from:expr, $path:expr, $expected:expr) => {
        let found = $farm
            .tree
            .get($from, $path, &$farm.types)
            .expect("Path lookup failed");
        assert_eq!(
            found,
            Some(canopy_core::Target::Value($expected)),
            "Unexpected value at {}",
            $path
        );
    };
}

/// Asserts that `get(path)` from `$from` resolves to the given node.
#[macro_export]
macro_rules! assert_node_at {
    ($farm:expr, $from:expr, $path:expr, $expected:expr) => {
        let found = $farm
            .tree
            .get($from, $path, &$farm.types)
            .expect("Path lookup failed");
        assert_eq!(
            found,
            Some(canopy_core::Target::Node($expected)),
            "Unexpected node at {}",
            $path
        );
    };
}

/// Asserts that `$id` is visible from `$from`.
#[macro_export]
macro_rules! assert_in_scope {
    ($tree:expr, $from:expr, $id:expr) => {
        let visible = $tree.find_all($from, None).expect("Scope lookup failed");
        assert!(
            visible.contains(&$id),
            "{} should be visible from {}",
            $tree.full_path($id).unwrap(),
            $tree.full_path($from).unwrap()
        );
    };
}

/// Asserts that `$id` is NOT visible from `$from`.
#[macro_export]
macro_rules! assert_not_in_scope {
    ($tree:expr, $from:expr, $id:expr) => {
        let visible = $tree.find_all($from, None).expect("Scope lookup failed");
        assert!(
            !visible.contains(&$id),
            "{} should not be visible from {}",
            $tree.full_path($id).unwrap(),
            $tree.full_path($from).unwrap()
        );
    };
}
