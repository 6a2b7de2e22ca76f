use crate::functions::{Comparison, Converter, Modifier, Operator};
use crate::settings::Settings;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Per-call configuration: host extension tables plus [`Settings`].
///
/// Comparison, operator and converter names are matched case-insensitively,
/// like built-in operator names. Modifier names are matched exactly.
#[derive(Clone, Default)]
pub struct Options {
    comparisons: HashMap<String, Arc<dyn Comparison>>,
    operators: HashMap<String, Arc<dyn Operator>>,
    modifiers: HashMap<String, Arc<dyn Modifier>>,
    converters: HashMap<String, Arc<dyn Converter>>,
    pub settings: Settings,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_comparison<C: Comparison + 'static>(mut self, name: &str, c: C) -> Self {
        self.register_comparison(name, c);
        self
    }

    pub fn with_operator<O: Operator + 'static>(mut self, name: &str, o: O) -> Self {
        self.register_operator(name, o);
        self
    }

    pub fn with_modifier<M: Modifier + 'static>(mut self, name: &str, m: M) -> Self {
        self.register_modifier(name, m);
        self
    }

    pub fn with_converter<C: Converter + 'static>(mut self, name: &str, c: C) -> Self {
        self.register_converter(name, c);
        self
    }

    pub fn register_comparison<C: Comparison + 'static>(&mut self, name: &str, c: C) {
        self.comparisons.insert(name.to_lowercase(), Arc::new(c));
    }

    pub fn register_operator<O: Operator + 'static>(&mut self, name: &str, o: O) {
        self.operators.insert(name.to_lowercase(), Arc::new(o));
    }

    pub fn register_modifier<M: Modifier + 'static>(&mut self, name: &str, m: M) {
        self.modifiers.insert(name.to_string(), Arc::new(m));
    }

    pub fn register_converter<C: Converter + 'static>(&mut self, name: &str, c: C) {
        self.converters.insert(name.to_lowercase(), Arc::new(c));
    }

    pub fn comparison(&self, name: &str) -> Option<&dyn Comparison> {
        self.comparisons.get(name).map(|c| c.as_ref())
    }

    pub fn operator(&self, name: &str) -> Option<&dyn Operator> {
        self.operators.get(name).map(|o| o.as_ref())
    }

    pub fn modifier(&self, name: &str) -> Option<&dyn Modifier> {
        self.modifiers.get(name).map(|m| m.as_ref())
    }

    pub fn converter(&self, name: &str) -> Option<&dyn Converter> {
        self.converters.get(name).map(|c| c.as_ref())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names(mut m: Vec<&String>) -> Vec<&String> {
            m.sort();
            m
        }
        f.debug_struct("Options")
            .field("comparisons", &names(self.comparisons.keys().collect()))
            .field("operators", &names(self.operators.keys().collect()))
            .field("modifiers", &names(self.modifiers.keys().collect()))
            .field("converters", &names(self.converters.keys().collect()))
            .field("settings", &self.settings)
            .finish()
    }
}
