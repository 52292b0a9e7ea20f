//! TOPOS-Xi tree-walking interpreter.
//!
//! Walks the parsed program with the symbol table built by the
//! analyzer. Spaces initialize their properties into the runtime state;
//! mappings execute their paths step by step, carrying a current value
//! through projections, pattern dispatch, recursive calls, and the
//! quantum measurement effect.
//!
//! Execution is traced to stdout in human-readable lines (`[Run]`,
//! `[Init]`, `[Exec]`, `-> Step:`). The one fatal runtime error is the
//! recursion guard; everything else is reported and skipped.

mod builtins;
pub mod error;
pub mod scope;
pub mod value;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;

use topos_parser::ast::{
    MappingDef, MatchExpr, PathStep, PropertyDef, SpaceDef, TypeExpr, Value as AstValue,
};
use topos_typeck::SymbolTable;

use builtins::apply_external;
pub use error::RuntimeError;
use scope::ScopeStack;
pub use value::{Position, QuantumState, Value};

/// Runtime state of one space: its initialized properties.
#[derive(Debug, Default)]
pub struct SpaceState {
    pub properties: FxHashMap<String, Value>,
}

/// The interpreter. One instance per `run` invocation.
pub struct Interpreter {
    symbols: SymbolTable,
    runtime_state: FxHashMap<String, SpaceState>,
    /// Space names in program order; hash-map iteration alone would make
    /// variable fallback and measurement broadcast nondeterministic.
    space_order: Vec<String>,
    mappings: FxHashMap<String, MappingDef>,
    scopes: ScopeStack,
    max_depth: usize,
    rng: StdRng,
}

impl Interpreter {
    /// Create an interpreter with OS-seeded measurement randomness.
    pub fn new(symbols: SymbolTable) -> Self {
        Self::with_rng(symbols, StdRng::from_os_rng())
    }

    /// Create an interpreter with a fixed measurement seed.
    pub fn with_seed(symbols: SymbolTable, seed: u64) -> Self {
        Self::with_rng(symbols, StdRng::seed_from_u64(seed))
    }

    fn with_rng(symbols: SymbolTable, rng: StdRng) -> Self {
        Self {
            symbols,
            runtime_state: FxHashMap::default(),
            space_order: Vec::new(),
            mappings: FxHashMap::default(),
            scopes: ScopeStack::new(),
            max_depth: 10,
            rng,
        }
    }

    /// Override the recursion depth limit (default 10).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// A space property's current value, for inspection after a run.
    pub fn property(&self, space: &str, name: &str) -> Option<&Value> {
        self.runtime_state.get(space)?.properties.get(name)
    }

    /// Execute a program: initialize every space, then invoke the entry
    /// mapping (when it exists) with no arguments.
    pub fn run(
        &mut self,
        program: &[SpaceDef],
        entry_point: &str,
    ) -> Result<Option<Value>, RuntimeError> {
        println!("\n--- Execution (Runtime) ---");

        for space in program {
            for member in &space.members {
                self.mappings.insert(member.name.clone(), member.clone());
            }
        }
        for space in program {
            self.execute_space(space)?;
        }

        if let Some(main) = self.mappings.get(entry_point).cloned() {
            println!("\n[Entry] Calling '{entry_point}'...");
            return self.execute_mapping(&main, Vec::new(), 0);
        }
        Ok(None)
    }

    // ── Spaces and properties ──────────────────────────────────────────

    fn execute_space(&mut self, space: &SpaceDef) -> Result<(), RuntimeError> {
        println!("[Run] Entering Space: {}", space.name);
        self.runtime_state
            .insert(space.name.clone(), SpaceState::default());
        self.space_order.push(space.name.clone());

        for prop in &space.properties {
            let value = self.init_property(prop)?;
            self.runtime_state
                .get_mut(&space.name)
                .expect("space state was just inserted")
                .properties
                .insert(prop.name.clone(), value);
        }
        Ok(())
    }

    /// Initialize one property from its declared type and default.
    fn init_property(&mut self, prop: &PropertyDef) -> Result<Value, RuntimeError> {
        let raw = match &prop.default {
            None => None,
            Some(AstValue::Call(call)) => {
                Some(self.evaluate_arg(&AstValue::Call(call.clone()), 0)?)
            }
            Some(AstValue::Number(n)) => Some(Value::Number(*n)),
            Some(AstValue::Str(s)) => Some(Value::Str(s.clone())),
            Some(AstValue::Ident(s)) => Some(Value::Str(s.clone())),
        };

        let head = match &prop.ty {
            TypeExpr::Name { name, .. } => name.as_str(),
            TypeExpr::Product(..) => "",
        };
        let value = match head {
            "Qubit" => match &raw {
                Some(Value::Str(s)) if s == "0" => Value::Quantum(QuantumState::zero()),
                Some(Value::Number(n)) if *n == 0.0 => Value::Quantum(QuantumState::zero()),
                Some(Value::Str(s)) if s == "1" => Value::Quantum(QuantumState::one()),
                Some(Value::Number(n)) if *n == 1.0 => Value::Quantum(QuantumState::one()),
                _ => Value::Quantum(QuantumState::superposition()),
            },
            "Number" => match raw {
                Some(value) => match value.as_number() {
                    Some(n) => Value::Number(n),
                    None => value,
                },
                None => Value::Number(0.0),
            },
            "Boolean" => match raw {
                Some(Value::Str(s)) => Value::Bool(s == "true"),
                Some(Value::Bool(b)) => Value::Bool(b),
                _ => Value::Bool(false),
            },
            "String" => match raw {
                Some(Value::Str(s)) => Value::Str(s.trim_matches('"').to_string()),
                Some(other) => Value::Str(other.to_string()),
                None => Value::Str(String::new()),
            },
            _ => raw.unwrap_or_else(|| Value::Str(String::new())),
        };

        println!("  [Init] Property '{}' set to: {}", prop.name, value);
        Ok(value)
    }

    // ── Variables and argument evaluation ──────────────────────────────

    /// Resolve a name: scope stack first, then every space's properties
    /// in program order.
    fn resolve_var(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.scopes.lookup(name) {
            return Some(value.clone());
        }
        for space in &self.space_order {
            if let Some(value) = self.runtime_state[space].properties.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    /// Evaluate a value in argument position.
    ///
    /// Unresolved identifiers evaluate to themselves as strings; unknown
    /// call names do the same.
    fn evaluate_arg(&mut self, arg: &AstValue, depth: usize) -> Result<Value, RuntimeError> {
        match arg {
            AstValue::Call(call) => {
                match call.name.as_str() {
                    "pair" => {
                        if call.args.len() < 2 {
                            println!("  [Error] pair requires 2 arguments");
                            return Ok(Value::Str("pair".to_string()));
                        }
                        let left = self.evaluate_arg(&call.args[0], depth)?;
                        let right = self.evaluate_arg(&call.args[1], depth)?;
                        Ok(Value::pair(left, right))
                    }
                    "fst" | "snd" => {
                        let Some(first) = call.args.first() else {
                            return Ok(Value::Str(call.name.clone()));
                        };
                        let value = self.evaluate_arg(first, depth)?;
                        Ok(match value {
                            Value::Pair(l, r) => {
                                if call.name == "fst" {
                                    *l
                                } else {
                                    *r
                                }
                            }
                            other => other,
                        })
                    }
                    name if self.is_external(name) => {
                        let mut args = Vec::with_capacity(call.args.len());
                        for arg in &call.args {
                            args.push(self.evaluate_arg(arg, depth)?);
                        }
                        Ok(apply_external(name, &args))
                    }
                    name if self.mappings.contains_key(name) => {
                        let def = self.mappings[name].clone();
                        let mut args = Vec::with_capacity(call.args.len());
                        for arg in &call.args {
                            args.push(self.evaluate_arg(arg, depth)?);
                        }
                        Ok(self
                            .execute_mapping(&def, args, depth + 1)?
                            .unwrap_or_else(|| Value::Str(name.to_string())))
                    }
                    name => Ok(Value::Str(name.to_string())),
                }
            }
            AstValue::Ident(name) => Ok(self
                .resolve_var(name)
                .unwrap_or_else(|| Value::Str(name.clone()))),
            AstValue::Number(n) => Ok(Value::Number(*n)),
            AstValue::Str(s) => Ok(Value::Str(s.clone())),
        }
    }

    fn is_external(&self, name: &str) -> bool {
        matches!(
            self.symbols.get(name),
            Some(topos_typeck::Symbol::External(_))
        )
    }

    // ── Mapping execution ──────────────────────────────────────────────

    /// Invoke a mapping: depth guard, one scope frame for parameters and
    /// local properties, then the path with the first argument as the
    /// initial current value. The frame is popped on every control path.
    fn execute_mapping(
        &mut self,
        def: &MappingDef,
        args: Vec<Value>,
        depth: usize,
    ) -> Result<Option<Value>, RuntimeError> {
        if depth > self.max_depth {
            return Err(RuntimeError::RecursionDepth {
                mapping: def.name.clone(),
                depth,
            });
        }
        let indent = "  ".repeat(depth + 1);
        println!("{indent}[Exec] Mapping '{}' (Depth {depth}):", def.name);

        let mut frame = FxHashMap::default();
        for (param, value) in def.params.iter().zip(args.iter()) {
            frame.insert(param.name.clone(), value.clone());
        }
        self.scopes.push(frame);

        let result = self.execute_mapping_body(def, args.into_iter().next(), depth);
        self.scopes.pop();
        result
    }

    fn execute_mapping_body(
        &mut self,
        def: &MappingDef,
        current: Option<Value>,
        depth: usize,
    ) -> Result<Option<Value>, RuntimeError> {
        for prop in &def.properties {
            let value = self.init_property(prop)?;
            self.scopes.bind(prop.name.clone(), value);
        }
        self.execute_path(&def.path, depth, current)
    }

    // ── Path execution ─────────────────────────────────────────────────

    fn execute_path(
        &mut self,
        path: &[PathStep],
        depth: usize,
        mut current: Option<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let indent = "  ".repeat(depth + 1);
        for step in path {
            match step {
                PathStep::Lambda(lambda) => {
                    self.scopes.push_empty();
                    let result = self.execute_path(&lambda.path, depth + 1, current.take());
                    self.scopes.pop();
                    current = result?;
                }
                PathStep::Match(m) => {
                    current = self.execute_match(m, depth, current)?;
                }
                PathStep::Ident(..) | PathStep::Call(_) => {
                    current = self.execute_named_step(step, depth, current)?;
                    let name = step.name().expect("named step");
                    match &current {
                        Some(value) => println!("{indent}  -> Step: {name} (out: {value})"),
                        None => println!("{indent}  -> Step: {name}"),
                    }
                }
            }
        }
        Ok(current)
    }

    /// Dispatch a match step: resolve the target, fall back to pair
    /// projections of the current value for the literal targets `fst`
    /// and `snd`, and run the first matching case.
    fn execute_match(
        &mut self,
        m: &MatchExpr,
        depth: usize,
        current: Option<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let indent = "  ".repeat(depth + 1);

        let mut target_value = self.resolve_var(&m.target);
        if target_value.is_none() {
            if let Some(Value::Pair(left, right)) = &current {
                if m.target == "fst" {
                    target_value = Some((**left).clone());
                } else if m.target == "snd" {
                    target_value = Some((**right).clone());
                }
            }
        }
        let target_text = target_value.map(|v| v.match_text());

        for case in &m.cases {
            let case_text = case.value.trim_matches('"');
            let matched =
                case_text == "_" || target_text.as_deref() == Some(case_text);
            if matched {
                println!("{indent}    [Match] Case '{case_text}' matched!");
                return self.execute_path(&case.path, depth + 1, current);
            }
        }
        Ok(current)
    }

    /// Execute one named step, returning the new current value.
    fn execute_named_step(
        &mut self,
        step: &PathStep,
        depth: usize,
        current: Option<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let indent = "  ".repeat(depth + 1);
        let name = step.name().expect("named step");
        let call = match step {
            PathStep::Call(call) => Some(call),
            _ => None,
        };

        // A bare identifier that resolves loads the variable.
        if call.is_none() {
            if let Some(value) = self.resolve_var(name) {
                return Ok(Some(value));
            }
        }

        match name {
            "fst" | "snd" => Ok(Some(match current {
                Some(Value::Pair(left, right)) => {
                    if name == "fst" {
                        *left
                    } else {
                        *right
                    }
                }
                other => {
                    let shown = display_option(&other);
                    println!("{indent}  [Error] {name} on non-pair: {shown}");
                    return Ok(other);
                }
            })),
            "pair" => match call {
                Some(call) if call.args.len() >= 2 => {
                    let left = self.evaluate_arg(&call.args[0], depth)?;
                    let right = self.evaluate_arg(&call.args[1], depth)?;
                    Ok(Some(Value::pair(left, right)))
                }
                _ => {
                    println!("{indent}  [Error] pair requires 2 arguments");
                    Ok(current)
                }
            },
            "Measurement" => Ok(self.execute_measurement(depth, current)),
            name if self.mappings.contains_key(name) => {
                let def = self.mappings[name].clone();
                let args = match call {
                    Some(call) => {
                        let mut args = Vec::with_capacity(call.args.len());
                        for arg in &call.args {
                            args.push(self.evaluate_arg(arg, depth)?);
                        }
                        args
                    }
                    None => current.into_iter().collect(),
                };
                self.execute_mapping(&def, args, depth + 1)
            }
            name if self.is_external(name) => {
                let args = match call {
                    Some(call) => {
                        let mut args = Vec::with_capacity(call.args.len());
                        for arg in &call.args {
                            args.push(self.evaluate_arg(arg, depth)?);
                        }
                        args
                    }
                    None => current.into_iter().collect(),
                };
                Ok(Some(apply_external(name, &args)))
            }
            // `init` is type-level only; unknown names pass the value
            // through untouched.
            _ => Ok(current),
        }
    }

    /// Measure the current value when it is a quantum state; otherwise
    /// collapse every quantum binding in scope and every quantum
    /// property in the runtime state.
    fn execute_measurement(&mut self, depth: usize, current: Option<Value>) -> Option<Value> {
        let indent = "  ".repeat(depth + 1);
        let current = match current {
            Some(Value::Quantum(mut q)) => {
                let outcome = q.measure(&mut self.rng);
                println!("{indent}    [Quantum] Measured: |{outcome}>");
                return Some(Value::Str(outcome));
            }
            other => other,
        };

        let rng = &mut self.rng;
        for frame in self.scopes.frames_mut() {
            let mut names: Vec<String> = frame.keys().cloned().collect();
            names.sort();
            for name in names {
                if let Some(Value::Quantum(q)) = frame.get_mut(&name) {
                    let outcome = q.measure(rng);
                    println!(
                        "{indent}    [Quantum] Wavefunction collapsed! {name} -> |{outcome}>"
                    );
                }
            }
        }
        for space in self.space_order.clone() {
            let state = self
                .runtime_state
                .get_mut(&space)
                .expect("space order tracks runtime state");
            let mut names: Vec<String> = state.properties.keys().cloned().collect();
            names.sort();
            for prop_name in names {
                if let Some(Value::Quantum(q)) = state.properties.get_mut(&prop_name) {
                    let outcome = q.measure(&mut self.rng);
                    println!(
                        "{indent}    [Quantum] Space wavefunction collapsed! {prop_name} -> |{outcome}>"
                    );
                }
            }
        }
        current
    }
}

fn display_option(value: &Option<Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "_".to_string(),
    }
}
