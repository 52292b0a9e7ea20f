//! Parametric scope for path analysis.
//!
//! A scope maps parameter names to their declared types. Frames are
//! pushed on entry to a mapping or lambda and popped on exit; lookup
//! walks from the innermost frame outward, so lambda parameters extend
//! (and may shadow) the enclosing mapping's parameters.

use rustc_hash::FxHashMap;

use topos_parser::ast::{Parameter, TypeExpr};

/// A stack of parameter-binding frames.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<FxHashMap<String, TypeExpr>>,
}

impl Scope {
    /// An empty scope with no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame binding each parameter's name to its declared type.
    pub fn push_params(&mut self, params: &[Parameter]) {
        let frame = params
            .iter()
            .map(|p| (p.name.clone(), p.ty.clone()))
            .collect();
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Look up a name, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&TypeExpr> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Substitute a type's top-level name through the scope, if bound.
    /// Substitution is a single step; parameters of a bound name are
    /// dropped with it, matching the language's scoped-name semantics.
    pub fn substitute<'a>(&'a self, ty: &'a TypeExpr) -> &'a TypeExpr {
        if let TypeExpr::Name { name, .. } = ty {
            if let Some(bound) = self.lookup(name) {
                return bound;
            }
        }
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topos_common::span::Span;

    fn param(name: &str, ty: TypeExpr) -> Parameter {
        Parameter {
            name: name.into(),
            ty,
            span: Span::point(0),
        }
    }

    #[test]
    fn lookup_walks_frames_innermost_first() {
        let mut scope = Scope::new();
        scope.push_params(&[param("a", TypeExpr::name("A"))]);
        scope.push_params(&[param("a", TypeExpr::name("Shadow"))]);
        assert_eq!(scope.lookup("a"), Some(&TypeExpr::name("Shadow")));
        scope.pop();
        assert_eq!(scope.lookup("a"), Some(&TypeExpr::name("A")));
        scope.pop();
        assert_eq!(scope.lookup("a"), None);
    }

    #[test]
    fn outer_bindings_visible_from_inner_frames() {
        let mut scope = Scope::new();
        scope.push_params(&[param("a", TypeExpr::name("A"))]);
        scope.push_params(&[param("b", TypeExpr::name("B"))]);
        assert_eq!(scope.lookup("a"), Some(&TypeExpr::name("A")));
        assert_eq!(scope.lookup("b"), Some(&TypeExpr::name("B")));
    }

    #[test]
    fn substitute_replaces_bound_top_level_names() {
        let mut scope = Scope::new();
        scope.push_params(&[param(
            "T",
            TypeExpr::product(TypeExpr::name("A"), TypeExpr::name("B")),
        )]);
        let t = TypeExpr::name("T");
        assert!(scope.substitute(&t).is_product());
        let u = TypeExpr::name("U");
        assert_eq!(scope.substitute(&u), &u);
    }
}
