use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, tempdir};
use ivysnap::cli::CliArgs;
use ivysnap::config::{load_and_validate, save_registry};
use ivysnap::errors::IvysnapError;
use ivysnap::fs::RealFileSystem;
use ivysnap::reconcile::reconcile;
use ivysnap::registry::{ConfigurationRegistry, InMemoryRegistry, find_cycle};
use ivysnap_test_utils::builders::DescriptorXml;

#[test]
fn cyclic_snapshot_loads_with_edges_intact() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[configuration.A]
dependencies = ["B"]

[configuration.B]
dependencies = ["A"]
"#
    )
    .unwrap();

    let snapshot = load_and_validate(file.path()).unwrap();
    assert_eq!(snapshot.configurations()["A"].dependencies, vec!["B"]);
    assert_eq!(snapshot.configurations()["B"].dependencies, vec!["A"]);
}

#[test]
fn reconciled_cycle_survives_save_and_reload() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[configuration.A.parameters]
AutoSetSnapshotDependenciesFromIvy = ""

[configuration.B]
dependencies = ["A"]

[configuration.B.parameters]
AutoSetSnapshotDependenciesFromIvy = ""
"#
    )
    .unwrap();

    let snapshot = load_and_validate(file.path()).unwrap();
    let mut registry = InMemoryRegistry::from_registry_file(&snapshot).unwrap();
    reconcile(&mut registry, &snapshot.gate().policy_keys(), "A", &["B".to_string()]).unwrap();
    assert!(find_cycle(&registry).unwrap().is_some());

    save_registry(
        &RealFileSystem,
        file.path(),
        &registry.to_registry_file(snapshot.gate().clone()),
    )
    .unwrap();
    let reloaded = load_and_validate(file.path()).unwrap();

    assert_eq!(reloaded.configurations()["A"].dependencies, vec!["B"]);
    assert_eq!(reloaded.configurations()["B"].dependencies, vec!["A"]);

    // a later replay still gets a working registry
    let mut again = InMemoryRegistry::from_registry_file(&reloaded).unwrap();
    reconcile(&mut again, &reloaded.gate().policy_keys(), "A", &[]).unwrap();
    assert!(again.targets_of("A").is_empty());
}

#[test]
fn unknown_dependency_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[configuration.A]
dependencies = ["NonExistent"]
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(IvysnapError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn gate_defaults_apply() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[configuration.A]\n").unwrap();

    let registry = load_and_validate(file.path()).unwrap();
    assert_eq!(registry.gate().descriptor_file_name, "ivy.xml");
    assert_eq!(registry.gate().artifact_pattern, "ivy*.xml");
    assert_eq!(registry.gate().opt_in_key, "AutoSetSnapshotDependenciesFromIvy");
    assert_eq!(registry.gate().opt_out_key, "DisableAutoDependFromMe");
}

#[test]
fn save_then_load_keeps_edges_and_parameters() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[configuration.App]
name = "App :: Build"
artifacts = "builds/app"
dependencies = ["Lib"]

[configuration.App.parameters]
AutoSetSnapshotDependenciesFromIvy = "true"

[configuration.Lib]
"#
    )
    .unwrap();

    let snapshot = load_and_validate(file.path()).unwrap();
    let mut registry = InMemoryRegistry::from_registry_file(&snapshot).unwrap();
    assert_eq!(registry.targets_of("App"), vec!["Lib"]);
    assert_eq!(registry.display_name("App"), "App :: Build");

    let edge = registry.dependencies("App").unwrap().remove(0);
    registry.remove_dependency("App", &edge).unwrap();
    registry.add_dependency("Lib", "App").unwrap();

    save_registry(
        &RealFileSystem,
        file.path(),
        &registry.to_registry_file(snapshot.gate().clone()),
    )
    .unwrap();
    let reloaded = load_and_validate(file.path()).unwrap();

    let app = &reloaded.configurations()["App"];
    assert!(app.dependencies.is_empty());
    assert_eq!(app.artifacts.as_deref(), Some("builds/app"));
    assert!(app.parameters.contains_key("AutoSetSnapshotDependenciesFromIvy"));
    assert_eq!(reloaded.configurations()["Lib"].dependencies, vec!["App"]);
}

#[test]
fn replaying_a_change_rewrites_the_registry() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let app = DescriptorXml::new("MyOrg", "App", "2.0");
    let app_next = app.clone().depends("MyOrg", "MyLibrary", "1.+");
    let lib = DescriptorXml::new("MyOrg", "MyLibrary", "1.0.4.2332");

    fs::create_dir_all(root.join("builds/app")).unwrap();
    fs::create_dir_all(root.join("builds/lib/ivy")).unwrap();
    fs::write(root.join("builds/app/ivy.xml"), app.build()).unwrap();
    fs::write(root.join("builds/lib/ivy/published.xml"), lib.build()).unwrap();
    fs::write(root.join("before.xml"), app.build()).unwrap();
    fs::write(root.join("after.xml"), app_next.build()).unwrap();

    let registry_path = root.join("Registry.toml");
    fs::write(
        &registry_path,
        r#"
[configuration.App]
artifacts = "builds/app"

[configuration.App.parameters]
AutoSetSnapshotDependenciesFromIvy = ""

[configuration.Lib]
artifacts = "builds/lib"
"#,
    )
    .unwrap();

    let changes_path = root.join("changes.toml");
    fs::write(
        &changes_path,
        "[[change]]\npath = \"app/ivy.xml\"\nbefore = \"before.xml\"\nafter = \"after.xml\"\n",
    )
    .unwrap();

    let args = |dry_run| CliArgs {
        registry: registry_path.to_string_lossy().to_string(),
        changes: changes_path.to_string_lossy().to_string(),
        log_level: None,
        dry_run,
    };

    ivysnap::run(args(true)).unwrap();
    let untouched = load_and_validate(&registry_path).unwrap();
    assert!(untouched.configurations()["App"].dependencies.is_empty());

    ivysnap::run(args(false)).unwrap();
    let updated = load_and_validate(&registry_path).unwrap();
    assert_eq!(updated.configurations()["App"].dependencies, vec!["Lib"]);
}
