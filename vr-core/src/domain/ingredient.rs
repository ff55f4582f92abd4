//! Ingredient domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reusable named configuration fragment attachable to swarms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub resource_uri: String,
    /// Resource URIs of swarms that include this ingredient
    #[serde(default)]
    pub swarms: Vec<String>,
}

/// How an operator refers to an ingredient on the command line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IngredientRef {
    Id(u64),
    Name(String),
}

impl IngredientRef {
    /// All-digit tokens are ids, everything else is a name.
    pub fn parse(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = token.parse() {
                return IngredientRef::Id(id);
            }
        }
        IngredientRef::Name(token.to_string())
    }
}

impl fmt::Display for IngredientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientRef::Id(id) => write!(f, "{}", id),
            IngredientRef::Name(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref() {
        assert_eq!(IngredientRef::parse("42"), IngredientRef::Id(42));
        assert_eq!(
            IngredientRef::parse("redis-cache"),
            IngredientRef::Name("redis-cache".to_string())
        );
        assert_eq!(IngredientRef::parse(""), IngredientRef::Name(String::new()));
    }
}
