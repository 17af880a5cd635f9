use dandelion::core::{Asset, AssetType, DandelionError};
use dandelion::storage::{BundleStorage, Strictness};
use dandelion::test_utils::{bundle, init_test_logging, names, storage_with};

#[test]
fn test_diamond() {
    init_test_logging(None);
    let storage = storage_with(&[("b1", &[]), ("b2", &["b1"]), ("b3", &["b1"]), ("b4", &["b2", "b3"])]);

    assert_eq!(names(storage.bundles_for("b1").unwrap()), ["b1"]);
    assert_eq!(names(storage.bundles_for("b2").unwrap()), ["b1", "b2"]);
    assert_eq!(names(storage.bundles_for("b3").unwrap()), ["b1", "b3"]);
    assert_eq!(names(storage.bundles_for("b4").unwrap()), ["b1", "b2", "b3", "b4"]);
}

#[test]
fn test_shared_dependencies_follow_declaration_order() {
    let storage = storage_with(&[
        ("b1", &[]),
        ("b2", &["b1"]),
        ("b3", &["b1", "b5"]),
        ("b4", &["b2", "b3"]),
        ("b5", &[]),
        ("b6", &["b5", "b3"]),
    ]);

    assert_eq!(names(storage.bundles_for("b3").unwrap()), ["b1", "b5", "b3"]);
    assert_eq!(names(storage.bundles_for("b4").unwrap()), ["b1", "b2", "b5", "b3", "b4"]);
    assert_eq!(names(storage.bundles_for("b6").unwrap()), ["b5", "b1", "b3", "b6"]);
}

#[test]
fn test_deep_graph_registered_out_of_order() {
    let storage = storage_with(&[
        ("b10", &["b12"]),
        ("b5", &["b9"]),
        ("b1", &["b3", "b4"]),
        ("b12", &[]),
        ("b4", &["b8", "b9"]),
        ("b2", &["b4", "b5"]),
        ("b9", &[]),
        ("b3", &["b7", "b8"]),
        ("b8", &[]),
        ("b7", &[]),
    ]);

    assert_eq!(names(storage.bundles_for("b1").unwrap()), ["b7", "b8", "b3", "b9", "b4", "b1"]);
    assert_eq!(names(storage.bundles_for("b2").unwrap()), ["b8", "b9", "b4", "b5", "b2"]);
    assert_eq!(names(storage.bundles_for("b10").unwrap()), ["b12", "b10"]);
}

#[test]
fn test_resolution_is_repeatable() {
    let storage = storage_with(&[("b1", &[]), ("b2", &["b1"]), ("b3", &["b2", "b1"])]);

    let first = names(storage.bundles_for("b3").unwrap());
    let second = names(storage.bundles_for("B3").unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_every_dependency_precedes_its_dependents() {
    let storage = storage_with(&[
        ("jquery", &[]),
        ("bootstrap", &["jquery"]),
        ("forms", &["jquery", "validation"]),
        ("validation", &["jquery"]),
        ("app", &["bootstrap", "forms", "jquery"]),
    ]);

    let resolved = names(storage.bundles_for("app").unwrap());
    assert_eq!(resolved.last(), Some(&"app"));

    let mut unique = resolved.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), resolved.len());

    for (position, name) in resolved.iter().enumerate() {
        let unit = storage.bundle_dag().vertex(name).unwrap();
        for dependency in unit.dependencies() {
            let dependency_position = resolved.iter().position(|n| n == dependency).unwrap();
            assert!(dependency_position < position, "{dependency} must precede {name}");
        }
    }
}

#[test]
fn test_override_replaces_dependencies_and_assets() {
    let mut storage = storage_with(&[("a", &[]), ("b", &[]), ("page", &["app"])]);
    let app = Asset::new("app", AssetType::Js).with_location("webapp", "/js/app.js");
    storage.store_bundles([bundle("app", &["a"]).with_asset(app)]).unwrap();

    storage.store_bundles([bundle("APP", &["b"])]).unwrap();

    assert_eq!(names(storage.bundles_for("app").unwrap()), ["b", "app"]);
    assert_eq!(names(storage.bundles_for("page").unwrap()), ["b", "app", "page"]);
    assert!(!storage.bundle_dag().has_edge("app", "a"));
    assert!(storage.bundle_dag().has_edge("App", "B"));
    assert!(storage.bundle_dag().vertex("app").unwrap().assets().is_empty());
}

#[test]
fn test_redefining_assets_leaves_dependents_unchanged() {
    let b1 = |location: &str| {
        bundle("b1", &[]).with_asset(Asset::new("b1", AssetType::Js).with_location("webapp", location))
    };
    let mut storage = BundleStorage::new();
    storage
        .store_bundles([b1("/js/b1.js"), bundle("b2", &["b1"]), bundle("b3", &["b1"]), bundle("b4", &["b2", "b3"])])
        .unwrap();
    let before: Vec<Vec<String>> = ["b2", "b3", "b4"]
        .iter()
        .map(|name| names(storage.bundles_for(name).unwrap()).into_iter().map(String::from).collect())
        .collect();

    storage.store_bundles([b1("/js/b1-2.0.js")]).unwrap();

    for (name, expected) in ["b2", "b3", "b4"].iter().zip(&before) {
        assert_eq!(&names(storage.bundles_for(name).unwrap()), expected);
    }
    let locations: Vec<_> = storage
        .assets_for(["b1"], &[] as &[&str])
        .unwrap()
        .into_iter()
        .filter_map(|asset| asset.first_location())
        .collect();
    assert_eq!(locations, ["/js/b1-2.0.js"]);
}

#[test]
fn test_two_bundle_cycle_is_rejected() {
    let mut storage = BundleStorage::new();

    let error = storage.store_bundles([bundle("a", &["b"]), bundle("b", &["a"])]).unwrap_err();
    match error {
        DandelionError::CycleDetected {
            vertex,
            chain,
        } => {
            assert!(vertex == "a" || vertex == "b");
            assert!(chain.starts_with(&vertex) && chain.ends_with(&vertex));
        }
        other => panic!("Expected CycleDetected, got {other:?}"),
    }
    assert!(storage.bundle_dag().is_empty());
}

#[test]
fn test_cycle_introduced_by_override_keeps_previous_graph() {
    let mut storage = storage_with(&[("b1", &[]), ("b2", &["b1"]), ("b3", &["b2"])]);

    assert!(storage.store_bundles([bundle("b1", &["b3"])]).is_err());
    assert_eq!(names(storage.bundles_for("b3").unwrap()), ["b1", "b2", "b3"]);
}

#[test]
fn test_unknown_root_resolves_to_nothing_when_lenient() {
    let storage = storage_with(&[("app", &["ghost"])]);

    assert!(storage.bundles_for("unknown").unwrap().is_empty());
    assert_eq!(names(storage.bundles_for("app").unwrap()), ["app"]);
    assert_eq!(storage.bundle_dag().dangling_dependencies(), [("app", "ghost")]);
}

#[test]
fn test_strict_storage_rejects_unknown_names() {
    let mut storage = BundleStorage::with_strictness(Strictness::Strict);
    storage.store_bundles([bundle("jquery", &[]), bundle("app", &["jquery"])]).unwrap();

    assert!(matches!(
        storage.bundles_for("ap"),
        Err(DandelionError::UnknownBundle { suggestion: Some(ref s), .. }) if s == "app"
    ));
    assert!(matches!(
        storage.store_bundles([bundle("admin", &["app", "ghost"])]),
        Err(DandelionError::DanglingDependency { .. })
    ));
    assert!(!storage.bundle_dag().contains("admin"));
}

#[test]
fn test_multiple_roots_resolve_into_one_list() {
    let storage = storage_with(&[("jquery", &[]), ("forms", &["jquery"]), ("charts", &["jquery"])]);

    assert_eq!(
        names(storage.bundles_for_all(["forms", "charts"]).unwrap()),
        ["jquery", "forms", "charts"]
    );
}
