// SPDX-License-Identifier: MIT

//! Runtime fact storage

use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::collections::HashMap;

use crate::engine::value::{coerce, Value};
use crate::error::{Result, RuleTableError};

/// A mutable name → value mapping a table reads conditions from and writes
/// outputs to.
///
/// A missing name reads as `None`; tables treat that as an unmet condition.
pub trait FactStore {
    fn get(&self, name: &str) -> Option<&Value>;
    fn set(&mut self, name: &str, value: Value);
}

impl FactStore for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<&Value> {
        HashMap::get(self, name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.insert(name.to_string(), value);
    }
}

/// In-memory fact store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts {
    values: HashMap<String, Value>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a `name=value` assignment, coercing the value like a table operand
    pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            RuleTableError::invalid_fact(format!("expected name=value, got '{}'", assignment))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RuleTableError::invalid_fact(format!(
                "missing fact name in '{}'",
                assignment
            )));
        }
        Ok((name.to_string(), coerce(raw)))
    }

    /// Build facts from a JSON object of scalars
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            RuleTableError::invalid_fact(format!("expected a JSON object, got {}", json))
        })?;

        let mut facts = Self::new();
        for (name, value) in object {
            let value = Value::from_json(value).map_err(|e| match e {
                RuleTableError::InvalidFact(reason) => {
                    RuleTableError::invalid_fact(format!("'{}': {}", name, reason))
                }
                other => other,
            })?;
            facts.values.insert(name.clone(), value);
        }
        Ok(facts)
    }

    /// Convert facts to a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<Map<String, serde_json::Value>>(),
        )
    }
}

impl FactStore for Facts {
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_facts() {
        let facts = Facts::new();
        assert!(facts.is_empty());
        assert!(facts.get("anything").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut facts = Facts::new().with("category", "child");
        FactStore::set(&mut facts, "category", Value::from("adult"));
        assert_eq!(facts.get("category"), Some(&Value::from("adult")));
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_hashmap_is_a_fact_store() {
        let mut map: HashMap<String, Value> = HashMap::new();
        FactStore::set(&mut map, "age", Value::Int(4));
        assert_eq!(FactStore::get(&map, "age"), Some(&Value::Int(4)));
        assert_eq!(FactStore::get(&map, "missing"), None);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            Facts::parse_assignment("age=20").unwrap(),
            ("age".to_string(), Value::Int(20))
        );
        assert_eq!(
            Facts::parse_assignment("member=True").unwrap(),
            ("member".to_string(), Value::Bool(true))
        );
        assert_eq!(
            Facts::parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), Value::from("a=b"))
        );
        assert!(Facts::parse_assignment("age").is_err());
        assert!(Facts::parse_assignment(" =3").is_err());
    }

    #[test]
    fn test_from_json() {
        let facts = Facts::from_json(&json!({"age": 20, "name": "ann", "vip": false})).unwrap();
        assert_eq!(facts.get("age"), Some(&Value::Int(20)));
        assert_eq!(facts.get("name"), Some(&Value::from("ann")));
        assert_eq!(facts.get("vip"), Some(&Value::Bool(false)));

        assert!(Facts::from_json(&json!([1, 2])).is_err());
        let err = Facts::from_json(&json!({"tags": ["a"]})).unwrap_err();
        assert!(err.to_string().contains("'tags'"));
    }

    #[test]
    fn test_to_json() {
        let facts = Facts::new().with("a", 1).with("b", "hello").with("c", 0.5);
        let json = facts.to_json();
        assert_eq!(json["a"], 1);
        assert_eq!(json["b"], "hello");
        assert_eq!(json["c"], 0.5);
    }

    #[test]
    fn test_serde_transparent() {
        let facts: Facts = serde_json::from_str(r#"{"age": 20}"#).unwrap();
        assert_eq!(facts.get("age"), Some(&Value::Int(20)));
    }
}
