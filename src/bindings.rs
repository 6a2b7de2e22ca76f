use serde_json::Value;
use std::collections::HashMap;

/// Local variables declared with `let` and read with `var`. One instance
/// lives for exactly one top-level evaluation.
#[derive(Debug, Default)]
pub struct Bindings {
    vars: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later bindings of the same name replace earlier ones.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bind_and_shadow() {
        let mut b = Bindings::new();
        assert_eq!(b.lookup("x"), None);
        b.bind("x", json!(1));
        b.bind("x", json!(2));
        assert_eq!(b.lookup("x"), Some(&json!(2)));
        assert_eq!(b.lookup("y"), None);
    }
}
