use std::collections::HashMap;

use crate::value::Value;

/// The render context: a stack of variable frames. Lookups search frames
/// top-down, so a pushed frame shadows names from outer frames.
pub struct Context {
    frames: Vec<HashMap<String, Value>>,
    autoescape: bool,
}

impl Context {
    pub fn new() -> Self {
        Context {
            frames: vec![HashMap::new()],
            autoescape: true,
        }
    }

    pub fn with_vars(vars: HashMap<String, Value>) -> Self {
        Context {
            frames: vec![vars],
            autoescape: true,
        }
    }

    pub fn autoescape(&self) -> bool {
        self.autoescape
    }

    pub fn set_autoescape(&mut self, autoescape: bool) {
        self.autoescape = autoescape;
    }

    /// Number of frames on the stack. Balanced across any render call.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a new empty frame onto the stack.
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the top frame. The root frame is never popped.
    pub fn pop(&mut self) -> Option<HashMap<String, Value>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Set a variable in the top frame.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Look up a name, searching from the innermost frame outward.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Resolve a dotted path like `user.name`, traversing maps and lists.
    /// Returns a clone so the context borrow ends before rendering continues.
    pub fn resolve_path(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.index(segment)?;
        }
        Some(current.clone())
    }

    /// Run `f` with one extra frame holding `vars`. The frame is popped on
    /// the way out whatever `f` returns, so errors inside the body cannot
    /// leave the stack unbalanced.
    pub fn scoped<T>(
        &mut self,
        vars: HashMap<String, Value>,
        f: impl FnOnce(&mut Context) -> T,
    ) -> T {
        self.frames.push(vars);
        let result = f(self);
        self.frames.pop();
        result
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}
