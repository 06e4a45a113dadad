//! Navigation depth as a stack of folder prefixes

use bn_core::path::ancestors;
use bn_core::{Error, Result};

/// Prefixes from the bucket root down to the folder being shown
///
/// Index 0 is always the root (`""`), so the stack is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStack {
    prefixes: Vec<String>,
}

impl PathStack {
    /// A stack holding only the root
    pub fn new() -> Self {
        Self {
            prefixes: vec![String::new()],
        }
    }

    /// A stack positioned at `prefix` with every ancestor below it
    pub fn from_prefix(prefix: &str) -> Self {
        let mut stack = Self::new();
        for ancestor in ancestors(prefix) {
            stack.push(ancestor);
        }
        stack
    }

    /// Folder currently shown
    pub fn top(&self) -> &str {
        self.prefixes.last().map(String::as_str).unwrap_or_default()
    }

    /// Descend into `prefix`
    pub fn push(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    /// Leave the current folder, returning its prefix
    pub fn pop(&mut self) -> Result<String> {
        if self.prefixes.len() <= 1 {
            return Err(Error::IllegalBack);
        }
        self.prefixes.pop().ok_or(Error::IllegalBack)
    }

    /// Number of levels, root included
    pub fn depth(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether Back is a legal action
    pub fn back_enabled(&self) -> bool {
        self.depth() > 1
    }
}

impl Default for PathStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_is_root() {
        let stack = PathStack::new();
        assert_eq!(stack.top(), "");
        assert_eq!(stack.depth(), 1);
        assert!(!stack.back_enabled());
    }

    #[test]
    fn test_pop_at_root_is_illegal() {
        let mut stack = PathStack::new();
        assert!(matches!(stack.pop(), Err(Error::IllegalBack)));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_then_pop_returns_to_root() {
        let mut stack = PathStack::new();
        stack.push("a/");
        stack.push("a/b/");
        stack.push("a/b/c/");
        assert_eq!(stack.depth(), 4);
        assert_eq!(stack.top(), "a/b/c/");
        assert!(stack.back_enabled());

        for _ in 0..3 {
            stack.pop().unwrap();
        }
        assert_eq!(stack.top(), "");
        assert!(!stack.back_enabled());
    }

    #[test]
    fn test_from_prefix_includes_ancestors() {
        let mut stack = PathStack::from_prefix("a/b/");
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.top(), "a/b/");
        assert_eq!(stack.pop().unwrap(), "a/b/");
        assert_eq!(stack.top(), "a/");
    }

    #[test]
    fn test_from_empty_prefix_is_root() {
        assert_eq!(PathStack::from_prefix(""), PathStack::new());
    }
}
