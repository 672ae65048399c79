use std::collections::BTreeMap;

/// Flat parameter mapping used to render endpoint URLs.
pub type Parameters = BTreeMap<String, String>;

/// Environment parameters: scalar values at this level plus nested override
/// trees keyed by interface name or service type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTree {
    values: Parameters,
    children: BTreeMap<String, ParameterTree>,
}

impl ParameterTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.insert_value(key, value);
        self
    }

    pub fn with_child(mut self, key: &str, child: ParameterTree) -> Self {
        self.insert_child(key, child);
        self
    }

    pub fn insert_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn insert_child(&mut self, key: &str, child: ParameterTree) {
        self.children.insert(key.to_string(), child);
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &Parameters {
        &self.values
    }

    pub fn child(&self, key: &str) -> Option<&ParameterTree> {
        self.children.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }
}
