//! Type equivalence, argument inference, and topological resolution.

use topos_common::topology::TopologyBag;
use topos_parser::ast::{TypeExpr, Value};

use crate::scope::Scope;
use crate::symbol::SymbolTable;

/// Syntactic type equivalence under a parametric scope.
///
/// Top-level names bound in the scope are substituted once on each side;
/// then names must match, both sides must agree on having parameters,
/// and parameters must be pairwise equivalent. No variance, no subtyping.
pub fn is_equivalent(t1: &TypeExpr, t2: &TypeExpr, scope: &Scope) -> bool {
    let lhs = scope.substitute(t1);
    let rhs = scope.substitute(t2);
    match (lhs, rhs) {
        (
            TypeExpr::Name {
                name: n1,
                params: p1,
            },
            TypeExpr::Name {
                name: n2,
                params: p2,
            },
        ) => {
            n1 == n2
                && p1.len() == p2.len()
                && p1
                    .iter()
                    .zip(p2.iter())
                    .all(|(a, b)| is_equivalent(a, b, scope))
        }
        (TypeExpr::Product(l1, r1), TypeExpr::Product(l2, r2)) => {
            is_equivalent(l1, l2, scope) && is_equivalent(r1, r2, scope)
        }
        _ => false,
    }
}

/// Infer the type of a value in argument position.
///
/// Calls take their entity's declared target; identifiers take their
/// scope binding, or stand for themselves when the symbol table knows
/// them; numeric literals are `Number`; everything else is `String`.
pub fn infer_value_type(value: &Value, symbols: &SymbolTable, scope: &Scope) -> TypeExpr {
    match value {
        Value::Call(call) => symbols
            .get(&call.name)
            .and_then(|sym| sym.target_type())
            .unwrap_or_else(|| TypeExpr::name("Unknown")),
        Value::Ident(name) => {
            if let Some(bound) = scope.lookup(name) {
                bound.clone()
            } else if symbols.contains(name) {
                TypeExpr::name(name.as_str())
            } else {
                TypeExpr::name("String")
            }
        }
        Value::Number(_) => TypeExpr::name("Number"),
        Value::Str(_) => TypeExpr::name("String"),
    }
}

/// Resolve the topological property bag of a type expression.
///
/// Scoped names resolve through their binding; products combine bags
/// under the invariant algebra; named types take the bag recorded for
/// their symbol, or an empty bag when nothing is known.
pub fn resolve_topology(ty: &TypeExpr, symbols: &SymbolTable, scope: &Scope) -> TopologyBag {
    match ty {
        TypeExpr::Name { name, .. } => {
            if let Some(bound) = scope.lookup(name) {
                // A self-referential binding (T bound to T) must not recurse.
                if bound.head() != Some(name.as_str()) {
                    return resolve_topology(bound, symbols, scope);
                }
            }
            symbols
                .get(name)
                .map(|sym| sym.topology())
                .unwrap_or_default()
        }
        TypeExpr::Product(left, right) => {
            let lp = resolve_topology(left, symbols, scope);
            let rp = resolve_topology(right, symbols, scope);
            lp.product(&rp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topos_common::span::Span;
    use topos_parser::ast::{MappingCall, Parameter};
    use topos_stdlib::ExternalEntity;

    use crate::symbol::Symbol;

    fn scope_with(name: &str, ty: TypeExpr) -> Scope {
        let mut scope = Scope::new();
        scope.push_params(&[Parameter {
            name: name.into(),
            ty,
            span: Span::point(0),
        }]);
        scope
    }

    fn entity(name: &str, bag: TopologyBag) -> Symbol {
        Symbol::External(ExternalEntity {
            name: name.into(),
            class: "Manifold".into(),
            effect: None,
            topology: bag,
            source: None,
            target: None,
            origin_file: "test.htf".into(),
            function_name: None,
        })
    }

    #[test]
    fn equivalence_is_syntactic() {
        let scope = Scope::new();
        assert!(is_equivalent(
            &TypeExpr::name("A"),
            &TypeExpr::name("A"),
            &scope
        ));
        assert!(!is_equivalent(
            &TypeExpr::name("A"),
            &TypeExpr::name("B"),
            &scope
        ));
    }

    #[test]
    fn equivalence_substitutes_scoped_names() {
        let scope = scope_with("T", TypeExpr::name("Qubit"));
        assert!(is_equivalent(
            &TypeExpr::name("T"),
            &TypeExpr::name("Qubit"),
            &scope
        ));
    }

    #[test]
    fn equivalence_compares_products_structurally() {
        let scope = Scope::new();
        let ab = TypeExpr::product(TypeExpr::name("A"), TypeExpr::name("B"));
        assert!(is_equivalent(&ab, &ab.clone(), &scope));
        let ba = TypeExpr::product(TypeExpr::name("B"), TypeExpr::name("A"));
        assert!(!is_equivalent(&ab, &ba, &scope));
        assert!(!is_equivalent(&ab, &TypeExpr::name("A"), &scope));
    }

    #[test]
    fn equivalence_requires_matching_parameter_lists() {
        let scope = Scope::new();
        let bare = TypeExpr::name("Register");
        let parameterized = TypeExpr::Name {
            name: "Register".into(),
            params: vec![TypeExpr::name("Qubit")],
        };
        assert!(!is_equivalent(&bare, &parameterized, &scope));
    }

    #[test]
    fn inference_covers_all_value_forms() {
        let mut symbols = SymbolTable::new();
        symbols.insert(
            "f",
            Symbol::Mapping {
                source: None,
                target: Some(TypeExpr::name("B")),
                property_types: Default::default(),
            },
        );
        symbols.insert("Torus", entity("Torus", TopologyBag::default()));
        let scope = scope_with("x", TypeExpr::name("A"));

        let call = Value::Call(MappingCall {
            name: "f".into(),
            args: vec![],
            span: Span::point(0),
        });
        assert_eq!(
            infer_value_type(&call, &symbols, &scope),
            TypeExpr::name("B")
        );
        assert_eq!(
            infer_value_type(&Value::Ident("x".into()), &symbols, &scope),
            TypeExpr::name("A")
        );
        assert_eq!(
            infer_value_type(&Value::Ident("Torus".into()), &symbols, &scope),
            TypeExpr::name("Torus")
        );
        assert_eq!(
            infer_value_type(&Value::Number(3.0), &symbols, &scope),
            TypeExpr::name("Number")
        );
        assert_eq!(
            infer_value_type(&Value::Str("3".into()), &symbols, &scope),
            TypeExpr::name("String")
        );
        assert_eq!(
            infer_value_type(&Value::Ident("mystery".into()), &symbols, &scope),
            TypeExpr::name("String")
        );
    }

    #[test]
    fn resolve_topology_combines_products() {
        let mut symbols = SymbolTable::new();
        symbols.insert(
            "Torus",
            entity(
                "Torus",
                TopologyBag {
                    dimension: Some(2),
                    euler_characteristic: Some(0),
                    is_orientable: Some(true),
                    fundamental_group: Some("Z x Z".into()),
                },
            ),
        );
        let scope = Scope::new();
        let tt = TypeExpr::product(TypeExpr::name("Torus"), TypeExpr::name("Torus"));
        let bag = resolve_topology(&tt, &symbols, &scope);
        assert_eq!(bag.dimension, Some(4));
        assert_eq!(bag.euler_characteristic, Some(0));
        assert_eq!(bag.fundamental_group.as_deref(), Some("Z x Z x Z x Z"));
    }

    #[test]
    fn resolve_topology_through_scope() {
        let mut symbols = SymbolTable::new();
        symbols.insert(
            "Sphere",
            entity(
                "Sphere",
                TopologyBag {
                    euler_characteristic: Some(2),
                    ..Default::default()
                },
            ),
        );
        let scope = scope_with("T", TypeExpr::name("Sphere"));
        let bag = resolve_topology(&TypeExpr::name("T"), &symbols, &scope);
        assert_eq!(bag.euler_characteristic, Some(2));
    }

    #[test]
    fn resolve_topology_unknown_is_empty() {
        let symbols = SymbolTable::new();
        let scope = Scope::new();
        assert!(resolve_topology(&TypeExpr::name("Nowhere"), &symbols, &scope).is_empty());
    }
}
