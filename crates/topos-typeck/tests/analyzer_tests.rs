//! End-to-end analyzer tests: parse TOPOS-Xi source and check it.

use rustc_hash::FxHashMap;

use topos_common::topology::TopologyBag;
use topos_stdlib::ExternalEntity;
use topos_typeck::{check, check_without_stdlib, SemanticError};

// ── Helpers ────────────────────────────────────────────────────────────

fn parse(source: &str) -> Vec<topos_parser::ast::SpaceDef> {
    topos_parser::parse_source(source).expect("source should parse")
}

fn entity(name: &str, bag: TopologyBag) -> ExternalEntity {
    ExternalEntity {
        name: name.into(),
        class: "Manifold".into(),
        effect: None,
        topology: bag,
        source: None,
        target: None,
        origin_file: "test.htf".into(),
        function_name: None,
    }
}

fn manifold(name: &str, euler: i64, orientable: bool, group: &str) -> ExternalEntity {
    entity(
        name,
        TopologyBag {
            dimension: Some(2),
            euler_characteristic: Some(euler),
            is_orientable: Some(orientable),
            fundamental_group: Some(group.into()),
        },
    )
}

fn stdlib_of(entities: Vec<ExternalEntity>) -> FxHashMap<String, ExternalEntity> {
    entities
        .into_iter()
        .map(|e| (e.name.clone(), e))
        .collect()
}

// ── Identity and composition laws ──────────────────────────────────────

#[test]
fn init_identity_mapping_checks() {
    let program = parse("space S { mapping f(): S -> S { path { init } } }");
    let analysis = check_without_stdlib(&program).expect("analysis should succeed");
    assert!(analysis.warnings.is_empty());
    assert!(analysis.symbols.contains("S"));
    assert!(analysis.symbols.contains("f"));
}

#[test]
fn unsigned_mapping_still_checks_internally() {
    let program = parse(
        "space A { }\nspace S { mapping f(x: A) { path { pair(x, x) -> fst } } }",
    );
    check_without_stdlib(&program).expect("analysis should succeed");
}

#[test]
fn composition_error_on_source_mismatch() {
    // B is a space, so a bare `B` step is self-typed B -> B; the cursor
    // holds A when it is reached.
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping f(): A -> A { path { init -> B } } }",
    );
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::CompositionError { step, expected, found, .. } => {
            assert_eq!(step, "B");
            assert_eq!(expected, "B");
            assert_eq!(found, "A");
        }
        other => panic!("expected composition error, got {other:?}"),
    }
}

#[test]
fn mapping_steps_compose_by_signature() {
    let program = parse(
        "space A { }\nspace B { }\nspace C { }\nspace S {\n  mapping g(): A -> B { path { init } }\n  mapping h(): B -> C { path { init } }\n  mapping f(): A -> C { path { g -> h } }\n}",
    );
    check_without_stdlib(&program).expect("g then h composes A -> C");
}

#[test]
fn unknown_bare_step_is_tolerated() {
    let program = parse("space A { mapping f(): A -> A { path { init -> mystery_step } } }");
    // `mystery_step` has no symbol entry: the cursor passes through it
    // unchanged and still satisfies the declared target.
    check_without_stdlib(&program).expect("unknown step should not abort analysis");
}

// ── Projections and pairs ──────────────────────────────────────────────

#[test]
fn fst_projects_product_source() {
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping g(a: A * B): A * B -> A { path { fst } } }",
    );
    check_without_stdlib(&program).expect("fst types A * B -> A");
}

#[test]
fn snd_with_wrong_target_is_a_morphism_error() {
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping g(a: A * B): A * B -> A { path { snd } } }",
    );
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::MorphismError { expected, found, .. } => {
            assert_eq!(expected, "A");
            assert_eq!(found, "B");
        }
        other => panic!("expected morphism error, got {other:?}"),
    }
}

#[test]
fn snd_with_matching_target_checks() {
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping g(a: A * B): A * B -> B { path { snd } } }",
    );
    check_without_stdlib(&program).expect("snd types A * B -> B");
}

#[test]
fn fst_on_non_product_is_a_projection_error() {
    let program = parse("space S { mapping f(): String -> String { path { fst } } }");
    let err = check_without_stdlib(&program).unwrap_err();
    assert!(matches!(err, SemanticError::ProjectionError { .. }), "{err:?}");
}

#[test]
fn projection_through_scoped_parameter() {
    // The declared source is the parameter name `p`; the scope binds it
    // to A * B, so `fst` sees a product after substitution.
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping g(p: A * B): p -> A { path { fst } } }",
    );
    check_without_stdlib(&program).expect("scoped name resolves to a product");
}

#[test]
fn pair_then_fst_restores_the_argument_type() {
    let program = parse(
        "space A { }\nspace S { mapping p(a: A): A -> A { path { pair(a, a) -> fst } } }",
    );
    check_without_stdlib(&program).expect("pair(a, a) -> fst types A -> A");
}

#[test]
fn pair_arity_must_be_exactly_two() {
    for body in ["pair()", "pair(a)", "pair(a, a, a)", "pair"] {
        let source = format!(
            "space A {{ mapping p(a: A): A -> A {{ path {{ {body} }} }} }}"
        );
        let err = check_without_stdlib(&parse(&source)).unwrap_err();
        assert!(
            matches!(err, SemanticError::PairError { .. }),
            "body {body:?} gave {err:?}"
        );
    }
}

// ── Paths, lambdas, matches ────────────────────────────────────────────

#[test]
fn empty_path_is_rejected() {
    let program = parse("space S { mapping f(): S -> S { path { } } }");
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::EmptyPath { context, .. } => assert_eq!(context, "f"),
        other => panic!("expected empty-path error, got {other:?}"),
    }
}

#[test]
fn lambda_body_sees_enclosing_parameters() {
    // The lambda's body uses `a`, bound by the enclosing mapping, and
    // its own parameter `x`. Both must resolve in the extended scope.
    let program = parse(
        "space A { }\nspace S { mapping f(a: A): A -> A { path { init -> (x: A) { path { pair(a, x) -> fst } } } } }",
    );
    check_without_stdlib(&program).expect("lambda scope extends the mapping scope");
}

#[test]
fn cursor_is_unknown_after_lambda() {
    // After the lambda the cursor is unknown, so a later `fst` cannot
    // prove a product source and must fail.
    let program = parse(
        "space A { }\nspace S { mapping f(a: A * A): A * A -> A { path { (x: A) { path { x } } -> fst } } }",
    );
    let err = check_without_stdlib(&program).unwrap_err();
    assert!(matches!(err, SemanticError::ProjectionError { .. }), "{err:?}");
}

#[test]
fn match_cases_inherit_the_cursor_type() {
    // Each case path starts from the cursor (A * B); `fst` inside a case
    // is legal while the same step after the match is not.
    let program = parse(
        "space A { }\nspace B { }\nspace S { mapping f(p: A * B): A * B -> A { path { match (p) { _ -> { path { fst } } } -> init } } }",
    );
    check_without_stdlib(&program).expect("case paths start from the incoming cursor");
}

#[test]
fn match_case_errors_propagate() {
    let program = parse(
        "space A { }\nspace S { mapping f(a: A): A -> A { path { match (a) { \"0\" -> { path { fst } } } -> init } } }",
    );
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::ProjectionError { context, .. } => assert_eq!(context, "case 0"),
        other => panic!("expected projection error from case body, got {other:?}"),
    }
}

// ── Property defaults ──────────────────────────────────────────────────

#[test]
fn literal_defaults_check_against_declared_types() {
    let program = parse(
        "space S { properties { n: Number = 3 m: Number = \"2.5\" b: Boolean = true s: String = \"x\" } }",
    );
    check_without_stdlib(&program).expect("all defaults are compatible");
}

#[test]
fn boolean_default_mismatch() {
    let program = parse("space S { properties { b: Boolean = 7 } }");
    let err = check_without_stdlib(&program).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }), "{err:?}");
}

#[test]
fn number_default_mismatch() {
    let program = parse("space S { properties { n: Number = \"many\" } }");
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::TypeMismatch { expected, found, .. } => {
            assert_eq!(expected, "Number");
            assert_eq!(found, "many");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
}

#[test]
fn unknown_declared_type_is_rejected() {
    let program = parse("space S { properties { q: Wormhole = \"0\" } }");
    let err = check_without_stdlib(&program).unwrap_err();
    match err {
        SemanticError::UnknownType { name, .. } => assert_eq!(name, "Wormhole"),
        other => panic!("expected unknown type, got {other:?}"),
    }
}

#[test]
fn stdlib_types_satisfy_property_declarations() {
    let program = parse("space S { properties { q: Qubit = \"0\" } }");
    let stdlib = stdlib_of(vec![entity("Qubit", TopologyBag::default())]);
    check(&program, stdlib).expect("Qubit comes from the standard library");
}

#[test]
fn a_property_may_use_its_own_space_type() {
    let program = parse("space S { properties { twin: S } }");
    check_without_stdlib(&program).expect("space registers before its properties");
}

// ── Topological invariants at init ─────────────────────────────────────

#[test]
fn torus_to_sphere_init_is_a_topological_violation() {
    let program = parse("space S { mapping f(): Torus -> Sphere { path { init } } }");
    let stdlib = stdlib_of(vec![
        manifold("Torus", 0, true, "Z x Z"),
        manifold("Sphere", 2, true, "0"),
    ]);
    let err = check(&program, stdlib).unwrap_err();
    match err {
        SemanticError::TopologicalViolation { source_euler, target_euler, .. } => {
            assert_eq!(source_euler, 0);
            assert_eq!(target_euler, 2);
        }
        other => panic!("expected topological violation, got {other:?}"),
    }
}

#[test]
fn orientation_violation_at_init() {
    let program = parse("space S { mapping f(): Sphere -> Mobius { path { init } } }");
    let stdlib = stdlib_of(vec![
        entity(
            "Sphere",
            TopologyBag {
                is_orientable: Some(true),
                ..Default::default()
            },
        ),
        entity(
            "Mobius",
            TopologyBag {
                is_orientable: Some(false),
                ..Default::default()
            },
        ),
    ]);
    let err = check(&program, stdlib).unwrap_err();
    assert!(matches!(err, SemanticError::OrientationViolation { .. }), "{err:?}");
}

#[test]
fn homotopy_violation_at_init() {
    let program = parse("space S { mapping f(): Circle -> Disk { path { init } } }");
    let stdlib = stdlib_of(vec![
        entity(
            "Circle",
            TopologyBag {
                fundamental_group: Some("Z".into()),
                ..Default::default()
            },
        ),
        entity(
            "Disk",
            TopologyBag {
                fundamental_group: Some("0".into()),
                ..Default::default()
            },
        ),
    ]);
    let err = check(&program, stdlib).unwrap_err();
    assert!(matches!(err, SemanticError::HomotopyViolation { .. }), "{err:?}");
}

#[test]
fn matching_invariants_pass_the_init_check() {
    let program = parse("space S { mapping f(): Torus -> Donut { path { init } } }");
    let stdlib = stdlib_of(vec![
        manifold("Torus", 0, true, "Z x Z"),
        manifold("Donut", 0, true, "Z x Z"),
    ]);
    check(&program, stdlib).expect("homeomorphic endpoints are compatible");
}

#[test]
fn space_literal_defaults_feed_the_topology_check() {
    // No standard library at all: the spaces' own literal defaults carry
    // the invariants.
    let program = parse(
        "space Torus { properties { euler_characteristic: Number = 0 } }\n\
         space Sphere { properties { euler_characteristic: Number = 2 } }\n\
         space S { mapping f(): Torus -> Sphere { path { init } } }",
    );
    let err = check_without_stdlib(&program).unwrap_err();
    assert!(matches!(err, SemanticError::TopologicalViolation { .. }), "{err:?}");
}

#[test]
fn product_bags_combine_across_init() {
    // Torus * Sphere has X = 0 * 2 = 0, matching Torus * Torus (0 * 0).
    let program = parse(
        "space S { mapping f(): Torus * Sphere -> Torus * Torus { path { init } } }",
    );
    let stdlib = stdlib_of(vec![
        manifold("Torus", 0, true, "0"),
        manifold("Sphere", 2, true, "0"),
    ]);
    check(&program, stdlib).expect("product Euler characteristics agree");
}

// ── External entities and effects ──────────────────────────────────────

#[test]
fn external_signature_drives_composition() {
    let mut reader = entity("read_char", TopologyBag::default());
    reader.source = Some("String".into());
    reader.target = Some("String * String".into());
    let program = parse(
        "space S { mapping f(s: String): String -> String { path { read_char -> fst } } }",
    );
    check(&program, stdlib_of(vec![reader])).expect("external signature threads the cursor");
}

#[test]
fn self_typed_external_requires_matching_cursor() {
    // An external with no signature is the identity on itself; reaching
    // it with a different cursor type is a composition error.
    let mut measurement = entity("Measurement", TopologyBag::default());
    measurement.effect = Some("Collapse_Wavefunction".into());
    let program = parse("space S { mapping m(): S -> S { path { init -> Measurement } } }");
    let err = check(&program, stdlib_of(vec![measurement])).unwrap_err();
    match err {
        SemanticError::CompositionError { step, .. } => assert_eq!(step, "Measurement"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn collapse_warning_collected_when_composition_is_clean() {
    let mut measurement = entity("Measurement", TopologyBag::default());
    measurement.effect = Some("Collapse_Wavefunction".into());
    measurement.source = Some("Qubit".into());
    measurement.target = Some("String".into());
    let program = parse(
        "space S { mapping m(q: Qubit): Qubit -> String { path { Measurement } } }",
    );
    let stdlib = stdlib_of(vec![measurement, entity("Qubit", TopologyBag::default())]);
    let analysis = check(&program, stdlib).expect("signed Measurement composes");
    assert_eq!(analysis.warnings.len(), 1);
    assert!(analysis.warnings[0]
        .message
        .contains("causes Wavefunction Collapse"));
}

#[test]
fn init_excuses_the_final_morphism_check() {
    // The path ends in B (g's target), not the declared target A, but a
    // bare init is present so the morphism check is skipped.
    let program = parse(
        "space A { }\nspace B { }\nspace S {\n  mapping g(): A -> B { path { init } }\n  mapping f(): A -> A { path { init -> g } }\n}",
    );
    check_without_stdlib(&program).expect("init excuses the final target check");
}
