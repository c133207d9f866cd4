use std::collections::HashMap;

use super::traits::Dialect;
use crate::ast::Value;

/// Bound parameters of a compiled expression, in binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Values in binding order, for positional dialects.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn to_map(&self) -> HashMap<String, Value> {
        self.entries.iter().cloned().collect()
    }
}

/// Context for parameterized expression building.
///
/// Names are `<owner>_<n>`, where the owner is the enclosing function (or
/// the compared column) and `n` counts per owner name.
#[derive(Debug, Default)]
pub struct ParamContext {
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    index: usize,
    counters: HashMap<String, usize>,
    params: Params,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, owner: &str, value: Value, dialect: &dyn Dialect) -> String {
        self.index += 1;
        let counter = self.counters.entry(owner.to_string()).or_insert(0);
        *counter += 1;
        let name = format!("{}_{}", owner, counter);
        let placeholder = dialect.placeholder(&name, self.index);
        self.params.entries.push((name, value));
        placeholder
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
