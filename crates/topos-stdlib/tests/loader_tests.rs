//! StdLibLoader integration tests against real directories.

use std::fs;

use topos_stdlib::StdLibLoader;

const TOPOLOGY_HTF: &str = r#"
TOPOS-Xi standard library: topology primitives.

[ENTITY: Torus]
[CLASS: Manifold]
[PROPERTIES:
  - dimension: Number = 2
  - euler_characteristic: Number = 0
  - is_orientable: Boolean = true
  - fundamental_group: String = "Z x Z"
]

[ENTITY: Sphere]
[CLASS: Manifold]
[PROPERTIES:
  - dimension: Number = 2
  - euler_characteristic: Number = 2
  - is_orientable: Boolean = true
  - fundamental_group: String = "0"
]
"#;

const QUANTUM_HTF: &str = r#"
[ENTITY: Qubit]
[CLASS: QuantumSpace]

[ENTITY: Measurement]
[CLASS: Observable]
[EFFECT: Collapse_Wavefunction]
[INPUT: Qubit]
[OUTPUT: String]
[FUNCTION: measure]
"#;

#[test]
fn loads_entities_from_multiple_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("topology.htf"), TOPOLOGY_HTF).unwrap();
    fs::write(dir.path().join("quantum.htf"), QUANTUM_HTF).unwrap();
    // Non-manifest files are ignored.
    fs::write(dir.path().join("notes.txt"), "[ENTITY: Bogus]").unwrap();

    let defs = StdLibLoader::new(dir.path()).load().unwrap();

    let torus = &defs["Torus"];
    assert_eq!(torus.class, "Manifold");
    assert_eq!(torus.topology.euler_characteristic, Some(0));
    assert_eq!(torus.topology.fundamental_group.as_deref(), Some("Z x Z"));
    assert_eq!(torus.origin_file, "topology.htf");
    assert!(torus.effect.is_none());

    let sphere = &defs["Sphere"];
    assert_eq!(sphere.topology.euler_characteristic, Some(2));

    assert!(!defs.contains_key("Bogus"));
}

#[test]
fn effect_signature_and_function_alias() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("quantum.htf"), QUANTUM_HTF).unwrap();

    let defs = StdLibLoader::new(dir.path()).load().unwrap();

    let measurement = &defs["Measurement"];
    assert_eq!(measurement.effect.as_deref(), Some("Collapse_Wavefunction"));
    assert_eq!(measurement.source.as_deref(), Some("Qubit"));
    assert_eq!(measurement.target.as_deref(), Some("String"));
    assert_eq!(measurement.function_name.as_deref(), Some("measure"));

    // The alias resolves to the same record (modulo nothing -- a clone).
    assert_eq!(&defs["measure"], measurement);

    // Qubit has no signature or properties; it still registers.
    let qubit = &defs["Qubit"];
    assert_eq!(qubit.class, "QuantumSpace");
    assert!(qubit.topology.is_empty());
}

#[test]
fn tags_do_not_leak_between_entities() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lib.htf"),
        "[ENTITY: First]\n\n[ENTITY: Second]\n[CLASS: Manifold]\n[EFFECT: Collapse_Wavefunction]\n",
    )
    .unwrap();

    let defs = StdLibLoader::new(dir.path()).load().unwrap();
    assert_eq!(defs["First"].class, "Unknown");
    assert!(defs["First"].effect.is_none());
    assert_eq!(defs["Second"].class, "Manifold");
}

#[test]
fn product_signatures_survive_as_raw_strings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lexer.htf"),
        "[ENTITY: advance_pos]\n[CLASS: Morphism]\n[INPUT: Position * String]\n[OUTPUT: Position]\n",
    )
    .unwrap();

    let defs = StdLibLoader::new(dir.path()).load().unwrap();
    assert_eq!(
        defs["advance_pos"].source.as_deref(),
        Some("Position * String")
    );
}

#[test]
fn missing_directory_is_an_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let defs = StdLibLoader::new(&missing).load().unwrap();
    assert!(defs.is_empty());
}
