use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Server-assigned identifier.
///
/// The remote service decides the shape; numeric ids stay numeric on the
/// wire and anything else round-trips as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(trimmed.to_string()),
        })
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// Nested `{ "id": ... }` reference object used in payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        Self { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_text_ids_keep_wire_shape() {
        let numeric: EntityId = serde_json::from_value(json!(7)).unwrap();
        let text: EntityId = serde_json::from_value(json!("a1b2")).unwrap();

        assert_eq!(numeric, EntityId::Number(7));
        assert_eq!(text, EntityId::Text("a1b2".to_string()));
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("a1b2"));
    }

    #[test]
    fn test_parse_from_form_input() {
        assert_eq!(" 12 ".parse::<EntityId>().unwrap(), EntityId::Number(12));
        assert_eq!("abc".parse::<EntityId>().unwrap(), EntityId::Text("abc".to_string()));
    }

    #[test]
    fn test_entity_ref_nests_id() {
        let reference = EntityRef::from(EntityId::from(2));
        assert_eq!(serde_json::to_value(&reference).unwrap(), json!({ "id": 2 }));
    }
}
