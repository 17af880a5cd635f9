use assert_cmd::Command;
use dandelion::test_utils::write_bundle_file;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Project directory with a configuration file and two bundle locations.
fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_bundle_file(
        temp.path(),
        "dandelion.toml",
        "bundle_locations = [\"bundles\"]\nvendor_bundle_locations = [\"vendor\"]\n",
    );
    write_bundle_file(
        temp.path(),
        "vendor/jquery.json",
        r#"{ "bundle": "jquery", "assets": [{ "locations": { "webapp": "/vendor/jquery.js" } }] }"#,
    );
    write_bundle_file(
        temp.path(),
        "bundles/app.json",
        r#"[
            { "bundle": "forms", "dependencies": ["jquery"], "assets": [{ "locations": { "webapp": "/js/forms.js" } }] },
            { "bundle": "app", "dependencies": ["forms", "jquery"], "assets": [{ "locations": { "webapp": "/js/app.js" } }] }
        ]"#,
    );
    temp
}

fn dandelion(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dandelion").unwrap();
    cmd.current_dir(dir.path()).env_remove("DANDELION_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_resolve_assets_in_dependency_order() {
    let project = project();

    dandelion(&project)
        .args(["-q", "resolve", "app", "--assets"])
        .assert()
        .success()
        .stdout("/vendor/jquery.js\n/js/forms.js\n/js/app.js\n");
}

#[test]
fn test_resolve_with_exclusion() {
    let project = project();

    dandelion(&project)
        .args(["-q", "resolve", "APP", "--assets", "--exclude", "jquery"])
        .assert()
        .success()
        .stdout("/js/forms.js\n/js/app.js\n");
}

#[test]
fn test_resolve_json() {
    let project = project();

    let output = dandelion(&project).args(["-q", "resolve", "forms", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["bundle"], "jquery");
    assert_eq!(value[0]["vendor"], true);
    assert_eq!(value[1]["bundle"], "forms");
}

#[test]
fn test_unknown_bundle_lenient_and_strict() {
    let project = project();

    dandelion(&project).args(["-q", "resolve", "ap"]).assert().success().stdout("");

    dandelion(&project)
        .args(["-q", "--strict", "resolve", "ap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundle 'ap' not found"))
        .stderr(predicate::str::contains("Did you mean 'app'?"));
}

#[test]
fn test_tree() {
    let project = project();

    dandelion(&project)
        .args(["-q", "tree", "app"])
        .assert()
        .success()
        .stdout("app\n├── forms\n│   └── jquery\n└── jquery (*)\n");
}

#[test]
fn test_graph_order_and_dot() {
    let project = project();

    dandelion(&project).args(["-q", "graph", "--order"]).assert().success().stdout("jquery\nforms\napp\n");

    dandelion(&project)
        .args(["-q", "graph"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph").and(predicate::str::contains("label = \"forms\"")));
}

#[test]
fn test_validate_reports_dangling_dependency() {
    let project = project();
    write_bundle_file(project.path(), "bundles/admin.json", r#"{ "bundle": "admin", "dependencies": ["app", "charts"] }"#);

    dandelion(&project)
        .args(["-q", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("depends on unknown bundle 'charts'"))
        .stdout(predicate::str::contains("4 bundle(s)"));

    dandelion(&project)
        .args(["-q", "--strict", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundle 'admin' depends on unknown bundle 'charts'"));
}

#[test]
fn test_validate_reports_cycle() {
    let project = project();
    write_bundle_file(project.path(), "bundles/zz-cycle.json", r#"{ "bundle": "jquery", "dependencies": ["app"] }"#);

    let output = dandelion(&project).args(["-q", "validate", "--format", "json"]).output().unwrap();
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["valid"], false);
    assert!(value["errors"][0].as_str().unwrap().contains("Circular dependency"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Circular dependency"));
}

#[test]
fn test_invalid_definition_file() {
    let project = project();
    write_bundle_file(project.path(), "bundles/broken.json", "{ \"bundle\": ");

    dandelion(&project)
        .args(["-q", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bundle definition"))
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_missing_explicit_config() {
    let project = project();

    dandelion(&project)
        .args(["-q", "--config", "missing.toml", "graph"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
#[serial]
fn test_config_from_environment() {
    let project = project();
    let elsewhere = TempDir::new().unwrap();

    Command::cargo_bin("dandelion")
        .unwrap()
        .current_dir(elsewhere.path())
        .env("DANDELION_CONFIG", project.path().join("dandelion.toml"))
        .env_remove("RUST_LOG")
        .args(["-q", "graph", "--order"])
        .assert()
        .success()
        .stdout("jquery\nforms\napp\n");
}

#[test]
#[serial]
fn test_without_config_nothing_is_loaded() {
    let empty = TempDir::new().unwrap();

    dandelion(&empty).args(["-q", "validate"]).assert().success().stdout(predicate::str::contains("0 bundle(s)"));
}
