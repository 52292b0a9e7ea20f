//! Runtime scope stack.
//!
//! One frame per mapping or lambda invocation, pushed on entry and
//! popped on exit on every control path. Lookup walks from the top of
//! the stack downward.

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A stack of local variable frames. The bottom frame is the global
/// scope and is never popped.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<FxHashMap<String, Value>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push(&mut self, frame: FxHashMap<String, Value>) {
        self.frames.push(frame);
    }

    pub fn push_empty(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the global scope");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind a name in the current (topmost) frame.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.frames
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.into(), value);
    }

    /// Look up a name, topmost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Mutable access to every frame, topmost first. Used by the
    /// measurement broadcast to collapse quantum bindings in place.
    pub(crate) fn frames_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut FxHashMap<String, Value>> {
        self.frames.iter_mut().rev()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
