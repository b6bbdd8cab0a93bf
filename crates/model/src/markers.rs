use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Collected annotation values keyed by marker name.
///
/// A marker may be declared several times; queries by name return the last
/// declared value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerValues(BTreeMap<String, Vec<Value>>);

impl MarkerValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value declared for `name`
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.entry(name.into()).or_default().push(value);
    }

    /// Builder-style [`MarkerValues::insert`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Last declared value for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).and_then(|values| values.last())
    }

    #[must_use]
    pub fn get_all(&self, name: &str) -> &[Value] {
        self.0.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Marker names in lexicographic order, each with its declared values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Copy every marker of `other` whose name is not present yet.
    /// Returns the number of inherited names.
    pub fn inherit_from(&mut self, other: &Self) -> usize {
        let mut inherited = 0;
        for (name, values) in &other.0 {
            if !self.0.contains_key(name) {
                self.0.insert(name.clone(), values.clone());
                inherited += 1;
            }
        }
        inherited
    }

    /// Keep only markers whose name satisfies `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }
}

impl FromIterator<(String, Value)> for MarkerValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut markers = Self::new();
        for (name, value) in iter {
            markers.insert(name, value);
        }
        markers
    }
}

/// Plain display form of a marker value.
///
/// Strings are shown verbatim, arrays as `[a b]` and objects as
/// `map[k:v k2:v2]` with keys in sorted order.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{key}:{}", display_value(value)))
                .collect();
            format!("map[{}]", entries.join(" "))
        }
    }
}
