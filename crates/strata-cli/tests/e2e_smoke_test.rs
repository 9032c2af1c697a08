use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::{TempDir, tempdir};

use strata::StrataError;
use strata_cli::{Args, run};

/// Demo corpora live at the workspace root
fn demo_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
        .join(name)
}

fn args_for(input: &Path, out: &TempDir) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        csv: out.path().join("dependency_tree.csv").to_string_lossy().to_string(),
        json: out.path().join("dependency_tree.json").to_string_lossy().to_string(),
        config: None,
        extension: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_fhir_demo_levels_and_trees() {
    let out = tempdir().expect("Failed to create temp directory");
    let args = args_for(&demo_dir("fhir"), &out);

    run(&args).expect("demo corpus should level cleanly");

    let csv = fs::read_to_string(&args.csv).expect("CSV written");
    assert_eq!(
        csv,
        "Level,Resource,Dependencies\r\n\
         0,CodeableConcept,\r\n\
         1,Meta,CodeableConcept\r\n\
         1,Reference,CodeableConcept\r\n\
         2,Encounter,\"CodeableConcept, Meta, Reference\"\r\n\
         2,Observation,\"CodeableConcept, Meta, Reference\"\r\n\
         2,Organization,\"CodeableConcept, Meta, Reference\"\r\n\
         2,Patient,\"CodeableConcept, Meta, Reference\"\r\n\
         2,Practitioner,\"CodeableConcept, Meta, Reference\"\r\n"
    );

    let json = fs::read_to_string(&args.json).expect("JSON written");
    let trees: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let roots: Vec<&str> = trees
        .as_array()
        .unwrap()
        .iter()
        .map(|tree| tree["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        roots,
        vec!["Encounter", "Observation", "Organization", "Patient", "Practitioner"]
    );

    // Leaves carry no `children` key at all
    let leaf = &trees[0]["children"][0];
    assert_eq!(leaf["name"], "CodeableConcept");
    assert!(leaf.get("children").is_none());
    assert!(json.starts_with("[\n  {\n    \"name\": \"Encounter\""));
}

#[test]
fn e2e_cycle_writes_partial_csv_only() {
    let out = tempdir().expect("Failed to create temp directory");
    let args = args_for(&demo_dir("cyclic"), &out);

    let err = run(&args).expect_err("cycle should fail the run");
    match &err {
        StrataError::Cycle(cycle) => {
            let unresolved: Vec<String> = cycle.unresolved().iter().map(|id| id.to_string()).collect();
            assert_eq!(unresolved, vec!["A", "B"]);
        }
        other => panic!("Expected cycle error, got {other:?}"),
    }

    let csv = fs::read_to_string(&args.csv).expect("partial CSV written");
    assert_eq!(csv, "Level,Resource,Dependencies\r\n0,C,\r\n");
    assert!(!Path::new(&args.json).exists(), "JSON must be skipped on cycle");
}

#[test]
fn e2e_config_file_and_extension_override() {
    let input = tempdir().expect("Failed to create temp directory");
    fs::write(
        input.path().join("user.gql"),
        "type UserEdge { node: User }\ntype User implements Node { org: Org }",
    )
    .unwrap();
    fs::write(input.path().join("org.gql"), "type Org implements Node { name: Text }").unwrap();
    fs::write(input.path().join("ignored.graphql"), "type Ignored { u: User }").unwrap();

    let config_path = input.path().join("strata.toml");
    fs::write(
        &config_path,
        "[vocabulary]\nscalars = [\"Text\"]\nmarkers = [\"Node\"]\n",
    )
    .unwrap();

    let out = tempdir().expect("Failed to create temp directory");
    let mut args = args_for(input.path(), &out);
    args.config = Some(config_path.to_string_lossy().to_string());
    args.extension = Some("gql".to_string());

    run(&args).expect("run should succeed");

    let csv = fs::read_to_string(&args.csv).unwrap();
    assert_eq!(csv, "Level,Resource,Dependencies\r\n0,Org,\r\n1,User,Org\r\n");
}

#[test]
fn e2e_reject_policy_fails_on_duplicate_definitions() {
    let input = tempdir().expect("Failed to create temp directory");
    fs::write(input.path().join("a.graphql"), "type A { n: Name }\ntype Name { v: String }").unwrap();
    fs::write(input.path().join("b.graphql"), "type B { n: Name }\ntype Name { w: String }").unwrap();

    let config_path = input.path().join("strata.toml");
    fs::write(&config_path, "[resolve]\nconflict_policy = \"reject\"\n").unwrap();

    let out = tempdir().expect("Failed to create temp directory");
    let mut args = args_for(input.path(), &out);
    args.config = Some(config_path.to_string_lossy().to_string());

    let err = run(&args).expect_err("duplicate definition should be rejected");
    assert!(matches!(err, StrataError::Resolve { .. }));
    assert!(!Path::new(&args.csv).exists());
}

#[test]
fn e2e_missing_input_directory() {
    let out = tempdir().expect("Failed to create temp directory");
    let args = args_for(&out.path().join("nowhere"), &out);

    let err = run(&args).expect_err("missing directory should fail");
    assert!(matches!(err, StrataError::Io(_)));
}

#[test]
fn e2e_empty_directory_writes_empty_outputs() {
    let input = tempdir().expect("Failed to create temp directory");
    let out = tempdir().expect("Failed to create temp directory");
    let args = args_for(input.path(), &out);

    run(&args).expect("empty input is not an error");

    assert_eq!(fs::read_to_string(&args.csv).unwrap(), "Level,Resource,Dependencies\r\n");
    assert_eq!(fs::read_to_string(&args.json).unwrap(), "[]");
}
