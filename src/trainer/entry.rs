use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// User or item identifier as it comes in the input: a number or a string.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    String(String),
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => write!(formatter, "{}", id),
            Self::String(id) => formatter.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

/// Single input line: an observation if the rating is present, a query otherwise.
#[derive(Deserialize, Debug)]
pub struct Entry {
    pub user: EntityId,
    pub item: EntityId,

    #[serde(default)]
    pub rating: Option<f64>,
}

/// Single output line.
#[derive(Serialize, Debug)]
pub struct Prediction<'a> {
    pub user: &'a EntityId,
    pub item: &'a EntityId,
    pub prediction: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn parse_observation_ok() -> Result {
        let entry: Entry = serde_json::from_str(r#"{"user": "Alice", "item": 42, "rating": 8}"#)?;
        assert_eq!(entry.user, EntityId::from("Alice"));
        assert_eq!(entry.item, EntityId::Number(42));
        assert_eq!(entry.rating, Some(8.0));
        Ok(())
    }

    #[test]
    fn parse_query_ok() -> Result {
        let entry: Entry = serde_json::from_str(r#"{"user": 1, "item": "Star Wars"}"#)?;
        assert!(entry.rating.is_none());
        Ok(())
    }

    #[test]
    fn parse_missing_item_fails() {
        assert!(serde_json::from_str::<Entry>(r#"{"user": 1, "rating": 1.0}"#).is_err());
    }

    #[test]
    fn serialize_prediction_ok() -> Result {
        let user = EntityId::from("Bob");
        let item = EntityId::from(7);
        let prediction = Prediction {
            user: &user,
            item: &item,
            prediction: 0.5,
            rating: None,
        };
        assert_eq!(
            serde_json::to_string(&prediction)?,
            r#"{"user":"Bob","item":7,"prediction":0.5}"#,
        );
        Ok(())
    }
}
