//! Todo resource as seen over the wire

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Server-assigned todo identifier.
///
/// Services disagree on whether ids are numbers or strings, so the value is
/// kept in whatever JSON form the service returned and rendered verbatim
/// into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Integer(i64),
    Text(String),
}

impl TodoId {
    /// Extract an id from a JSON value, rejecting anything that is not an
    /// integer or a non-empty string
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n.as_i64().map(TodoId::Integer),
            JsonValue::String(s) if !s.is_empty() => Some(TodoId::Text(s.clone())),
            _ => None,
        }
    }
}

impl Default for TodoId {
    fn default() -> Self {
        TodoId::Integer(1)
    }
}

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        TodoId::Integer(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

impl FromStr for TodoId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::invalid_value(
                "todo_id",
                s,
                "an integer or non-empty string",
            ));
        }

        Ok(trimmed
            .parse::<i64>()
            .map(TodoId::Integer)
            .unwrap_or_else(|_| TodoId::Text(trimmed.to_string())))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Integer(id) => write!(f, "{}", id),
            TodoId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A todo as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// Any additional columns the service chooses to return
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Creation payload for `POST /todos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_todo_id_accepts_integer_and_string() {
        assert_eq!(TodoId::from_json(&json!(42)), Some(TodoId::Integer(42)));
        assert_eq!(
            TodoId::from_json(&json!("a1b2")),
            Some(TodoId::Text("a1b2".to_string()))
        );
    }

    #[test]
    fn test_todo_id_rejects_other_shapes() {
        assert_eq!(TodoId::from_json(&json!(null)), None);
        assert_eq!(TodoId::from_json(&json!("")), None);
        assert_eq!(TodoId::from_json(&json!(1.5)), None);
        assert_eq!(TodoId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn test_todo_id_parsing() {
        assert_eq!("7".parse::<TodoId>().unwrap(), TodoId::Integer(7));
        assert_eq!(
            "abc".parse::<TodoId>().unwrap(),
            TodoId::Text("abc".to_string())
        );
        assert!("  ".parse::<TodoId>().is_err());
    }

    #[test]
    fn test_todo_id_display_is_path_ready() {
        assert_eq!(TodoId::Integer(12).to_string(), "12");
        assert_eq!(TodoId::from("uuid-1").to_string(), "uuid-1");
        assert_eq!(TodoId::default().to_string(), "1");
    }

    #[test]
    fn test_todo_keeps_extra_columns() {
        let todo: Todo = serde_json::from_value(json!({
            "id": 3,
            "title": "test",
            "completed": false
        }))
        .unwrap();

        assert_eq!(todo.id, TodoId::Integer(3));
        assert_eq!(todo.title, "test");
        assert_eq!(todo.extra.get("completed"), Some(&json!(false)));
    }

    #[test]
    fn test_new_todo_serializes_title_only() {
        let payload = serde_json::to_value(NewTodo::new("test")).unwrap();
        assert_eq!(payload, json!({"title": "test"}));
    }
}
