//! The analysis pass: symbol registration, default checking, and path
//! composition under the topological invariants.

use rustc_hash::FxHashMap;

use topos_common::span::Span;
use topos_common::topology::TopologyBag;
use topos_parser::ast::{
    LambdaMapping, MappingDef, MatchExpr, PathStep, PropertyDef, SpaceDef, TypeExpr, Value,
};

use crate::error::{SemanticError, Warning};
use crate::scope::Scope;
use crate::symbol::{Symbol, SymbolTable};
use crate::types::{infer_value_type, is_equivalent, resolve_topology};
use crate::Analysis;

/// The effect tag the analyzer surfaces as a warning.
const COLLAPSE_EFFECT: &str = "Collapse_Wavefunction";

pub(crate) struct SemanticAnalyzer {
    symbols: SymbolTable,
    warnings: Vec<Warning>,
}

impl SemanticAnalyzer {
    pub(crate) fn new(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, program: &[SpaceDef]) -> Result<Analysis, SemanticError> {
        for space in program {
            self.visit_space(space)?;
        }
        Ok(Analysis {
            symbols: self.symbols,
            warnings: self.warnings,
        })
    }

    // ── Spaces and properties ──────────────────────────────────────────

    fn visit_space(&mut self, space: &SpaceDef) -> Result<(), SemanticError> {
        // Register the space before checking its properties so a property
        // may be declared with the space's own type.
        self.symbols.insert(
            space.name.clone(),
            Symbol::Space {
                property_types: FxHashMap::default(),
                topology: TopologyBag::default(),
            },
        );

        let mut property_types = FxHashMap::default();
        let mut topology = TopologyBag::default();
        for prop in &space.properties {
            self.verify_default(prop)?;
            absorb_topology_default(&mut topology, prop);
            property_types.insert(prop.name.clone(), prop.ty.clone());
        }
        self.symbols.insert(
            space.name.clone(),
            Symbol::Space {
                property_types,
                topology,
            },
        );

        for member in &space.members {
            self.visit_mapping(member)?;
        }
        Ok(())
    }

    /// Check a literal property default against its declared type.
    ///
    /// Call defaults are evaluated at runtime and not checked here.
    fn verify_default(&self, prop: &PropertyDef) -> Result<(), SemanticError> {
        let head = match &prop.ty {
            TypeExpr::Product(..) => return Ok(()),
            TypeExpr::Name { name, .. } => name.as_str(),
        };
        match head {
            "Boolean" => {
                if let Some(default) = &prop.default {
                    let ok = matches!(
                        default,
                        Value::Ident(s) | Value::Str(s) if s == "true" || s == "false"
                    );
                    if !ok {
                        return Err(SemanticError::TypeMismatch {
                            expected: "Boolean".into(),
                            found: default.as_step_text(),
                            span: prop.span,
                        });
                    }
                }
            }
            "Number" => {
                if let Some(default) = &prop.default {
                    let ok = match default {
                        Value::Number(_) => true,
                        Value::Str(s) | Value::Ident(s) => s.parse::<f64>().is_ok(),
                        Value::Call(_) => true,
                    };
                    if !ok {
                        return Err(SemanticError::TypeMismatch {
                            expected: "Number".into(),
                            found: default.as_step_text(),
                            span: prop.span,
                        });
                    }
                }
            }
            "String" | "Topology" | "Quantum" => {}
            name if self.symbols.contains(name) => {}
            name => {
                return Err(SemanticError::UnknownType {
                    name: name.to_string(),
                    span: prop.span,
                });
            }
        }
        Ok(())
    }

    // ── Mappings ───────────────────────────────────────────────────────

    fn visit_mapping(&mut self, mapping: &MappingDef) -> Result<(), SemanticError> {
        // Register before analyzing the body so recursive steps resolve.
        let mut property_types = FxHashMap::default();
        for prop in &mapping.properties {
            property_types.insert(prop.name.clone(), prop.ty.clone());
        }
        self.symbols.insert(
            mapping.name.clone(),
            Symbol::Mapping {
                source: mapping.source.clone(),
                target: mapping.target.clone(),
                property_types,
            },
        );

        for prop in &mapping.properties {
            self.verify_default(prop)?;
        }

        let mut scope = Scope::new();
        scope.push_params(&mapping.params);
        self.analyze_path(
            &mapping.name,
            &mapping.path,
            mapping.source.as_ref(),
            mapping.target.as_ref(),
            &mut scope,
            mapping.span,
        )
    }

    fn visit_lambda(
        &mut self,
        lambda: &LambdaMapping,
        scope: &mut Scope,
    ) -> Result<(), SemanticError> {
        scope.push_params(&lambda.params);
        let result = self.analyze_path("anonymous", &lambda.path, None, None, scope, lambda.span);
        scope.pop();
        result
    }

    fn visit_match(
        &mut self,
        m: &MatchExpr,
        cursor: Option<&TypeExpr>,
        scope: &mut Scope,
    ) -> Result<(), SemanticError> {
        for case in &m.cases {
            let context = format!("case {}", case.value);
            self.analyze_path(&context, &case.path, cursor, None, scope, case.span)?;
        }
        Ok(())
    }

    // ── Path analysis ──────────────────────────────────────────────────

    /// Walk a path left to right, threading the cursor type.
    ///
    /// The cursor starts at the declared source and becomes unknown
    /// after a lambda or match step (no union-type inference). A step
    /// that declares a source must match the cursor; a step that
    /// declares a target replaces it. `init` asserts the enclosing
    /// mapping's signature and triggers the topological check.
    fn analyze_path(
        &mut self,
        context: &str,
        path: &[PathStep],
        expected_src: Option<&TypeExpr>,
        expected_dst: Option<&TypeExpr>,
        scope: &mut Scope,
        context_span: Span,
    ) -> Result<(), SemanticError> {
        if path.is_empty() {
            return Err(SemanticError::EmptyPath {
                context: context.to_string(),
                span: context_span,
            });
        }

        let mut cursor: Option<TypeExpr> = expected_src.cloned();
        for step in path {
            match step {
                PathStep::Lambda(lambda) => {
                    self.visit_lambda(lambda, scope)?;
                    cursor = None;
                }
                PathStep::Match(m) => {
                    self.visit_match(m, cursor.as_ref(), scope)?;
                    cursor = None;
                }
                PathStep::Ident(..) | PathStep::Call(_) => {
                    cursor = self.analyze_named_step(
                        context,
                        step,
                        cursor,
                        expected_src,
                        expected_dst,
                        scope,
                    )?;
                }
            }
        }

        if let (Some(dst), Some(cur)) = (expected_dst, &cursor) {
            let has_init = path.iter().any(PathStep::is_bare_init);
            if !has_init && !is_equivalent(cur, dst, scope) {
                return Err(SemanticError::MorphismError {
                    context: context.to_string(),
                    expected: dst.to_string(),
                    found: cur.to_string(),
                    span: path.last().map(PathStep::span).unwrap_or(context_span),
                });
            }
        }

        for step in path {
            let Some(name) = step.name() else { continue };
            if let Some(sym) = self.symbols.get(name) {
                if sym.effect() == Some(COLLAPSE_EFFECT) {
                    self.warnings.push(Warning {
                        message: format!("Step '{name}' causes Wavefunction Collapse."),
                        span: step.span(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Analyze one named step and return the new cursor type.
    fn analyze_named_step(
        &mut self,
        context: &str,
        step: &PathStep,
        cursor: Option<TypeExpr>,
        expected_src: Option<&TypeExpr>,
        expected_dst: Option<&TypeExpr>,
        scope: &Scope,
    ) -> Result<Option<TypeExpr>, SemanticError> {
        let name = step.name().expect("named step");
        let span = step.span();

        // Projections consume the cursor's product structure.
        if name == "fst" || name == "snd" {
            let resolved = cursor.as_ref().map(|c| scope.substitute(c));
            let Some(TypeExpr::Product(left, right)) = resolved else {
                return Err(SemanticError::ProjectionError {
                    context: context.to_string(),
                    step: name.to_string(),
                    found: cursor.as_ref().map(|c| c.to_string()),
                    span,
                });
            };
            let projected = if name == "fst" { left } else { right };
            return Ok(Some((**projected).clone()));
        }

        // Pair construction produces a product of the argument types.
        if name == "pair" {
            if let PathStep::Call(call) = step {
                if call.args.len() == 2 {
                    let left = infer_value_type(&call.args[0], &self.symbols, scope);
                    let right = infer_value_type(&call.args[1], &self.symbols, scope);
                    return Ok(Some(TypeExpr::product(left, right)));
                }
            }
            return Err(SemanticError::PairError {
                context: context.to_string(),
                span,
            });
        }

        let symbol = self.symbols.get(name);
        let mut step_src = symbol.and_then(Symbol::source_type);
        let mut step_dst = symbol.and_then(Symbol::target_type);
        if symbol.is_some_and(Symbol::is_self_typed) {
            step_src = step_src.or_else(|| Some(TypeExpr::name(name)));
            step_dst = step_dst.or_else(|| Some(TypeExpr::name(name)));
        }

        if let (Some(src), Some(cur)) = (&step_src, &cursor) {
            if name != "init" && !is_equivalent(cur, src, scope) {
                return Err(SemanticError::CompositionError {
                    context: context.to_string(),
                    step: name.to_string(),
                    expected: src.to_string(),
                    found: cur.to_string(),
                    span,
                });
            }
        }

        if let Some(dst) = step_dst {
            return Ok(Some(dst));
        }
        if name == "init" {
            if let (Some(src), Some(dst)) = (expected_src, expected_dst) {
                self.check_init_compatibility(context, src, dst, scope, span)?;
            }
            return Ok(expected_dst.cloned());
        }
        Ok(cursor)
    }

    /// The topological compatibility check at an `init` site.
    fn check_init_compatibility(
        &self,
        context: &str,
        src: &TypeExpr,
        dst: &TypeExpr,
        scope: &Scope,
        span: Span,
    ) -> Result<(), SemanticError> {
        let sp = resolve_topology(src, &self.symbols, scope);
        let dp = resolve_topology(dst, &self.symbols, scope);

        if let (Some(se), Some(de)) = (sp.euler_characteristic, dp.euler_characteristic) {
            if se != de {
                return Err(SemanticError::TopologicalViolation {
                    context: context.to_string(),
                    source: src.to_string(),
                    target: dst.to_string(),
                    source_euler: se,
                    target_euler: de,
                    span,
                });
            }
        }
        if let (Some(src_or), Some(dst_or)) = (sp.is_orientable, dp.is_orientable) {
            if src_or != dst_or {
                return Err(SemanticError::OrientationViolation {
                    context: context.to_string(),
                    source: src.to_string(),
                    target: dst.to_string(),
                    source_orientable: src_or,
                    target_orientable: dst_or,
                    span,
                });
            }
        }
        let sf = sp.fundamental_group.filter(|g| !g.is_empty());
        let df = dp.fundamental_group.filter(|g| !g.is_empty());
        if let (Some(sf), Some(df)) = (sf, df) {
            if sf != df {
                return Err(SemanticError::HomotopyViolation {
                    context: context.to_string(),
                    source: src.to_string(),
                    target: dst.to_string(),
                    source_group: sf,
                    target_group: df,
                    span,
                });
            }
        }
        Ok(())
    }
}

/// Fold a literal topology default into a space's property bag.
fn absorb_topology_default(bag: &mut TopologyBag, prop: &PropertyDef) {
    let Some(default) = &prop.default else { return };
    match (prop.name.as_str(), default) {
        ("dimension", Value::Number(n)) => bag.dimension = Some(*n as i64),
        ("euler_characteristic", Value::Number(n)) => bag.euler_characteristic = Some(*n as i64),
        ("is_orientable", Value::Ident(s)) | ("is_orientable", Value::Str(s)) => {
            bag.is_orientable = match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }
        }
        ("fundamental_group", Value::Str(s)) => bag.fundamental_group = Some(s.clone()),
        _ => {}
    }
}
