//! Lexical scope stack.
//!
//! A [`ScopeStack`] is a stack of name → value frames. The semantic
//! analyzer instantiates it with declared types, the code generator with
//! storage handles; both push a frame per function body, loop body, and
//! `if` branch and resolve names from the innermost frame outward.

use rustc_hash::FxHashMap;

/// Stack of lexical scope frames.
///
/// A fresh stack starts with a single root frame for module scope.
#[derive(Debug)]
pub struct ScopeStack<T> {
    frames: Vec<FxHashMap<String, T>>,
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Opens a new innermost frame.
    pub fn enter(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Drops the innermost frame. The root frame is never dropped.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Binds `name` in the innermost frame, shadowing any outer binding.
    pub fn declare(&mut self, name: impl Into<String>, value: T) {
        // frames is never empty: new() seeds the root and leave() keeps it
        self.frames
            .last_mut()
            .expect("scope stack has a root frame")
            .insert(name.into(), value);
    }

    /// Resolves `name`, searching from the innermost frame outward.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Whether `name` is bound in the innermost frame.
    pub fn is_declared_in_current(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    /// Number of open frames (the root counts).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
