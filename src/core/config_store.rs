//! Layered key/value configuration with named modes.
//!
//! Buildfiles declare configuration buckets (usually one per target) inside
//! a mode. Declaring the same bucket twice accumulates: list values are
//! concatenated, map values are merged key by key, scalars are replaced.
//! The store is filled once while roots are added and only read afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::util::config::DEFAULT_MODE;

/// Attribute naming the buckets a bucket depends on.
pub const REQUIRED: &str = "required";

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// The string payload of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value read as a list of names.
    ///
    /// A scalar is a one-element list; nested lists and maps contribute
    /// nothing.
    pub fn names(&self) -> Vec<String> {
        match self {
            ConfigValue::List(items) => items.iter().filter_map(ConfigValue::scalar_name).collect(),
            other => other.scalar_name().into_iter().collect(),
        }
    }

    fn scalar_name(&self) -> Option<String> {
        match self {
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Boolean(b) => Some(b.to_string()),
            ConfigValue::List(_) | ConfigValue::Map(_) => None,
        }
    }

    /// Merge `new` into `self`.
    ///
    /// list + list concatenates, map + map merges shallowly with `new`
    /// winning, anything else is replaced by `new`.
    pub fn merge(&mut self, new: ConfigValue) {
        match (self, new) {
            (ConfigValue::List(existing), ConfigValue::List(items)) => existing.extend(items),
            (ConfigValue::Map(existing), ConfigValue::Map(entries)) => existing.extend(entries),
            (slot, new) => *slot = new,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(d) => ConfigValue::String(d.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => ConfigValue::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ConfigValue::Map(entries) => {
                let parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// A named configuration bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigEntry {
    attributes: BTreeMap<String, ConfigValue>,
}

impl ConfigEntry {
    /// Get an attribute.
    pub fn get(&self, attribute: &str) -> Option<&ConfigValue> {
        self.attributes.get(attribute)
    }

    /// Iterate over all attributes.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names listed under the `required` attribute.
    pub fn required(&self) -> Vec<String> {
        self.get(REQUIRED).map(ConfigValue::names).unwrap_or_default()
    }

    fn merge(&mut self, attribute: String, value: ConfigValue) {
        match self.attributes.get_mut(&attribute) {
            Some(existing) => existing.merge(value),
            None => {
                self.attributes.insert(attribute, value);
            }
        }
    }
}

/// Handle to a declared mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mode(String);

impl Mode {
    /// The mode every Buildfile declaration goes to by default.
    pub fn global() -> Self {
        Mode(DEFAULT_MODE.to_string())
    }

    /// The mode name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The layered configuration store.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    modes: HashMap<String, HashMap<String, ConfigEntry>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        ConfigStore::default()
    }

    /// Declare a mode, creating it if needed.
    pub fn declare_mode(&mut self, name: &str) -> Mode {
        self.modes.entry(name.to_string()).or_default();
        Mode(name.to_string())
    }

    /// Merge attributes into the bucket `key` of `mode`.
    pub fn merge<I, K, V>(&mut self, mode: &Mode, key: &str, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        let entry = self
            .modes
            .entry(mode.0.clone())
            .or_default()
            .entry(key.to_string())
            .or_default();

        for (attribute, value) in values {
            entry.merge(attribute.into(), value.into());
        }
    }

    /// Whether a mode has been declared.
    pub fn has_mode(&self, mode: &str) -> bool {
        self.modes.contains_key(mode)
    }

    /// Get a bucket.
    pub fn entry(&self, mode: &str, key: &str) -> Option<&ConfigEntry> {
        self.modes.get(mode).and_then(|m| m.get(key))
    }

    /// Get one attribute of a bucket.
    pub fn get(&self, mode: &str, key: &str, attribute: &str) -> Option<&ConfigValue> {
        self.entry(mode, key).and_then(|e| e.get(attribute))
    }

    /// Names the bucket `key` requires in `mode`; empty when undeclared.
    pub fn required(&self, mode: &str, key: &str) -> Vec<String> {
        self.entry(mode, key)
            .map(ConfigEntry::required)
            .unwrap_or_default()
    }

    /// Names of every bucket declared in `mode`, sorted.
    pub fn keys(&self, mode: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .modes
            .get(mode)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_lists_accumulate() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");

        store.merge(&global, "app", [(REQUIRED, vec!["x"])]);
        store.merge(&global, "app", [(REQUIRED, vec!["y"])]);

        assert_eq!(store.required("global", "app"), vec!["x", "y"]);
    }

    #[test]
    fn test_scalars_overwrite() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");

        store.merge(&global, "app", [("title", "One")]);
        store.merge(&global, "app", [("title", "Two")]);

        assert_eq!(
            store.get("global", "app", "title"),
            Some(&ConfigValue::from("Two"))
        );
    }

    #[test]
    fn test_maps_merge_key_by_key() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");

        let first: BTreeMap<String, ConfigValue> = [
            ("a".to_string(), ConfigValue::from(1i64)),
            ("b".to_string(), ConfigValue::from(2i64)),
        ]
        .into_iter()
        .collect();
        let second: BTreeMap<String, ConfigValue> = [
            ("b".to_string(), ConfigValue::from(20i64)),
            ("c".to_string(), ConfigValue::from(30i64)),
        ]
        .into_iter()
        .collect();

        store.merge(&global, "app", [("opts", ConfigValue::Map(first))]);
        store.merge(&global, "app", [("opts", ConfigValue::Map(second))]);

        let Some(ConfigValue::Map(opts)) = store.get("global", "app", "opts") else {
            panic!("expected a map");
        };
        assert_eq!(opts.get("a"), Some(&ConfigValue::Integer(1)));
        assert_eq!(opts.get("b"), Some(&ConfigValue::Integer(20)));
        assert_eq!(opts.get("c"), Some(&ConfigValue::Integer(30)));
    }

    #[test]
    fn test_scalar_required_reads_as_single_name() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");
        store.merge(&global, "desktop", [(REQUIRED, "foundation")]);

        assert_eq!(store.required("global", "desktop"), vec!["foundation"]);
    }

    #[test]
    fn test_unset_reads_empty() {
        let store = ConfigStore::new();
        assert!(store.required("global", "nothing").is_empty());
        assert!(store.entry("debug", "nothing").is_none());
        assert!(!store.has_mode("debug"));
    }

    #[test]
    fn test_modes_are_isolated() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");
        let debug = store.declare_mode("debug");

        store.merge(&global, "app", [(REQUIRED, vec!["runtime"])]);
        store.merge(&debug, "app", [(REQUIRED, vec!["testing"])]);

        assert_eq!(store.required("global", "app"), vec!["runtime"]);
        assert_eq!(store.required("debug", "app"), vec!["testing"]);
        assert_eq!(store.keys("debug"), vec!["app"]);
    }
}
