//! Runtime values.

use std::fmt;

use rand::Rng;

/// A value produced during path execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    Pair(Box<Value>, Box<Value>),
    Quantum(QuantumState),
    Position(Position),
}

impl Value {
    pub fn pair(left: Value, right: Value) -> Value {
        Value::Pair(Box::new(left), Box::new(right))
    }

    /// Numeric view of a value, coercing numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// The string form used by match dispatch: the display form with any
    /// stray quotes stripped.
    pub fn match_text(&self) -> String {
        self.to_string().trim_matches('"').to_string()
    }
}

/// Format a number the way the runtime traces it: whole values keep one
/// decimal place (`3.0`), fractional values print as-is.
pub(crate) fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", fmt_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Pair(l, r) => write!(f, "({l}, {r})"),
            Value::Quantum(q) => write!(f, "{q}"),
            Value::Position(p) => write!(f, "{p}"),
        }
    }
}

/// A source position record, produced by the `init_pos` and
/// `advance_pos` builtins.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: f64,
    pub column: f64,
    pub offset: f64,
}

impl Position {
    /// The origin position: line 1, column 0, offset 0.
    pub fn origin() -> Self {
        Self {
            line: 1.0,
            column: 0.0,
            offset: 0.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{line: {}, column: {}, offset: {}}}",
            fmt_number(self.line),
            fmt_number(self.column),
            fmt_number(self.offset)
        )
    }
}

/// A two-level quantum state with real amplitudes.
///
/// Measurement only ever consumes the probability `alpha^2`, so the
/// amplitudes are stored as reals; states satisfy
/// `alpha^2 + beta^2 ~= 1`. After measurement one amplitude is 1, the
/// other 0, and `last_result` records the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    pub alpha: f64,
    pub beta: f64,
    pub last_result: Option<String>,
}

impl QuantumState {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha,
            beta,
            last_result: None,
        }
    }

    /// The basis state |0>.
    pub fn zero() -> Self {
        Self::new(1.0, 0.0)
    }

    /// The basis state |1>.
    pub fn one() -> Self {
        Self::new(0.0, 1.0)
    }

    /// The uniform superposition (|0> + |1>) / sqrt(2).
    pub fn superposition() -> Self {
        let amp = 1.0 / std::f64::consts::SQRT_2;
        Self::new(amp, amp)
    }

    /// Collapse the state: draw `r` in [0, 1); outcome `"0"` when
    /// `r < alpha^2`, `"1"` otherwise.
    pub fn measure(&mut self, rng: &mut impl Rng) -> String {
        let r: f64 = rng.random();
        let outcome = if r < self.alpha * self.alpha { "0" } else { "1" };
        if outcome == "0" {
            self.alpha = 1.0;
            self.beta = 0.0;
        } else {
            self.alpha = 0.0;
            self.beta = 1.0;
        }
        self.last_result = Some(outcome.to_string());
        outcome.to_string()
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_result {
            Some(result) => write!(f, "{result}"),
            None => write!(f, "{:.2}|0> + {:.2}|1>", self.alpha, self.beta),
        }
    }
}
