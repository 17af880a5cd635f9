use dandelion::config::DandelionConfig;
use dandelion::core::{AssetDomPosition, AssetType, DandelionError};
use dandelion::loader::{JsonBundleLoader, StaticBundleLoader};
use dandelion::storage::{BundleStorageContext, Strictness};
use dandelion::test_utils::{bundle, init_test_logging, names, write_bundle_file};
use tempfile::TempDir;

const VENDOR_BUNDLES: &str = r#"[
    {
        "bundle": "jquery",
        "assets": [{ "version": "1.10.2", "locations": { "cdn": "//cdn.example.com/jquery.min.js" } }]
    },
    {
        "bundle": "bootstrap",
        "dependencies": ["jquery"],
        "assets": [
            { "locations": { "webapp": "/vendor/bootstrap.js" } },
            { "locations": { "webapp": "/vendor/bootstrap.css" } }
        ]
    }
]"#;

const APP_BUNDLE: &str = r#"{
    "bundle": "App",
    "dependencies": ["Bootstrap"],
    "assets": [
        { "name": "app", "type": "js", "dom": "head", "locations": { "webapp": "/js/app.js" } }
    ]
}"#;

#[test]
fn test_build_from_json_directories() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    write_bundle_file(temp.path(), "vendor/bundles.json", VENDOR_BUNDLES);
    write_bundle_file(temp.path(), "app/app.json", APP_BUNDLE);

    let context = BundleStorageContext::new(Strictness::Strict)
        .with_loader(JsonBundleLoader::vendor(temp.path().join("vendor")))
        .with_loader(JsonBundleLoader::new(temp.path().join("app")));
    let storage = context.storage().unwrap();

    assert_eq!(names(storage.bundles_for("app").unwrap()), ["jquery", "bootstrap", "app"]);

    let bootstrap = storage.bundle_dag().vertex("bootstrap").unwrap();
    assert!(bootstrap.vendor);
    let types: Vec<_> = bootstrap.assets().iter().map(|asset| asset.asset_type).collect();
    assert_eq!(types, [Some(AssetType::Js), Some(AssetType::Css)]);
    assert_eq!(bootstrap.assets()[1].effective_dom_position(), Some(AssetDomPosition::Head));

    let jquery = &storage.bundle_dag().vertex("jquery").unwrap().assets()[0];
    assert_eq!(jquery.name.as_deref(), Some("jquery.min"));
    assert_eq!(jquery.bundle.as_deref(), Some("jquery"));
    assert!(jquery.bundle_loader_origin.as_deref().unwrap().starts_with("vendor-json:"));

    let app = storage.bundle_dag().vertex("app").unwrap();
    assert!(!app.vendor);
    assert_eq!(app.assets()[0].effective_dom_position(), Some(AssetDomPosition::Head));
}

#[test]
fn test_application_bundle_overrides_vendor_bundle() {
    let temp = TempDir::new().unwrap();
    write_bundle_file(temp.path(), "vendor/bundles.json", VENDOR_BUNDLES);
    write_bundle_file(
        temp.path(),
        "app/jquery.json",
        r#"{ "bundle": "JQUERY", "assets": [{ "locations": { "webapp": "/js/jquery-2.0.js" } }] }"#,
    );

    let context = BundleStorageContext::new(Strictness::Lenient)
        .with_loader(JsonBundleLoader::vendor(temp.path().join("vendor")))
        .with_loader(JsonBundleLoader::new(temp.path().join("app")));
    let storage = context.storage().unwrap();

    let jquery = storage.bundle_dag().vertex("jquery").unwrap();
    assert!(!jquery.vendor);
    assert_eq!(jquery.assets().len(), 1);
    assert_eq!(jquery.assets()[0].first_location(), Some("/js/jquery-2.0.js"));

    let locations: Vec<_> = storage
        .assets_for(["bootstrap"], &[] as &[&str])
        .unwrap()
        .into_iter()
        .filter_map(|asset| asset.first_location())
        .collect();
    assert_eq!(locations, ["/js/jquery-2.0.js", "/vendor/bootstrap.js", "/vendor/bootstrap.css"]);
}

#[test]
fn test_dev_mode_picks_up_edited_definitions() {
    let temp = TempDir::new().unwrap();
    write_bundle_file(temp.path(), "app.json", r#"{ "bundle": "app" }"#);

    let context = BundleStorageContext::new(Strictness::Lenient)
        .with_dev_mode(true)
        .with_loader(JsonBundleLoader::new(temp.path()));
    let before = context.storage().unwrap();
    assert_eq!(names(before.bundles_for("app").unwrap()), ["app"]);

    write_bundle_file(temp.path(), "app.json", r#"{ "bundle": "app", "dependencies": ["jquery"] }"#);
    write_bundle_file(temp.path(), "jquery.json", r#"{ "bundle": "jquery" }"#);

    let after = context.storage().unwrap();
    assert_eq!(names(after.bundles_for("app").unwrap()), ["jquery", "app"]);
    assert_eq!(names(before.bundles_for("app").unwrap()), ["app"]);
}

#[test]
fn test_cycle_across_loaders_fails_the_build() {
    let context = BundleStorageContext::new(Strictness::Lenient)
        .with_loader(StaticBundleLoader::new("first", [bundle("a", &["b"])]))
        .with_loader(StaticBundleLoader::new("second", [bundle("b", &["a"])]));

    let error = context.storage().unwrap_err();
    assert!(matches!(
        error.downcast_ref::<DandelionError>(),
        Some(DandelionError::CycleDetected { .. })
    ));
}

#[test]
fn test_asset_without_type_fails_the_build() {
    let temp = TempDir::new().unwrap();
    write_bundle_file(
        temp.path(),
        "images.json",
        r#"{ "bundle": "images", "assets": [{ "locations": { "webapp": "/img/logo.png" } }] }"#,
    );

    let context = BundleStorageContext::new(Strictness::Lenient).with_loader(JsonBundleLoader::new(temp.path()));

    let error = context.storage().unwrap_err();
    assert!(matches!(
        error.downcast_ref::<DandelionError>(),
        Some(DandelionError::InvalidAsset { .. })
    ));
}

#[tokio::test]
async fn test_context_from_config_file() {
    let temp = TempDir::new().unwrap();
    write_bundle_file(temp.path(), "vendor/bundles.json", VENDOR_BUNDLES);
    write_bundle_file(temp.path(), "bundles/app.json", APP_BUNDLE);
    write_bundle_file(
        temp.path(),
        "dandelion.toml",
        "bundle_locations = [\"bundles\"]\nvendor_bundle_locations = [\"vendor\"]\nstrict = true\n",
    );

    let config = DandelionConfig::load_from(&temp.path().join("dandelion.toml")).await.unwrap();
    let context = BundleStorageContext::from_config(&config);

    let loaders = context.loader_names();
    assert_eq!(loaders.len(), 2);
    assert!(loaders[0].starts_with("vendor-json:"));
    assert!(loaders[1].starts_with("json:"));

    let storage = context.storage().unwrap();
    assert_eq!(storage.strictness(), Strictness::Strict);
    assert_eq!(names(storage.bundles_for("app").unwrap()), ["jquery", "bootstrap", "app"]);
    assert!(storage.bundles_for("missing").is_err());
}
