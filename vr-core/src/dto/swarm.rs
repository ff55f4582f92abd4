//! Swarm DTOs

use serde::{Deserialize, Serialize};

/// Server-side narrowing of the swarm list
///
/// Derived from the literal (non-regex) tokens of a filter pattern so the
/// server returns fewer swarms; the filter itself is still applied locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwarmQuery {
    #[serde(rename = "app__name", skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proc_name: Option<String>,
}

impl SwarmQuery {
    /// Build a query from an `app-config-proc` style pattern.
    ///
    /// Tokens containing `.*` and empty tokens are left to the local filter.
    pub fn from_pattern(pattern: &str) -> Self {
        let mut tokens = pattern.split('-').map(|token| {
            if token.is_empty() || token.contains(".*") {
                None
            } else {
                Some(token.to_string())
            }
        });
        Self {
            app_name: tokens.next().flatten(),
            config_name: tokens.next().flatten(),
            proc_name: tokens.next().flatten(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.app_name.is_none() && self.config_name.is_none() && self.proc_name.is_none()
    }
}

/// Fields to persist on a swarm before it is dispatched
///
/// Only fields that are set are serialized, so the PATCH touches nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

impl SwarmChanges {
    pub fn is_empty(&self) -> bool {
        self == &SwarmChanges::default()
    }
}

/// The tag argument of the swarm command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagToken {
    /// `-`: leave the deployed version alone
    Keep,
    Set(String),
}

impl TagToken {
    pub const KEEP: &'static str = "-";

    pub fn parse(token: &str) -> Self {
        if token == Self::KEEP {
            TagToken::Keep
        } else {
            TagToken::Set(token.to_string())
        }
    }

    pub fn version(&self) -> Option<String> {
        match self {
            TagToken::Keep => None,
            TagToken::Set(tag) => Some(tag.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_literal_pattern() {
        let q = SwarmQuery::from_pattern("shop-prod-web");
        assert_eq!(q.app_name.as_deref(), Some("shop"));
        assert_eq!(q.config_name.as_deref(), Some("prod"));
        assert_eq!(q.proc_name.as_deref(), Some("web"));
    }

    #[test]
    fn test_query_skips_regex_tokens() {
        let q = SwarmQuery::from_pattern("shop-.*-web");
        assert_eq!(q.app_name.as_deref(), Some("shop"));
        assert_eq!(q.config_name, None);
        assert_eq!(q.proc_name.as_deref(), Some("web"));

        assert!(SwarmQuery::from_pattern("").is_empty());
        assert!(SwarmQuery::from_pattern(".*").is_empty());
    }

    #[test]
    fn test_query_serializes_api_keys() {
        let q = SwarmQuery::from_pattern("shop");
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({"app__name": "shop"})
        );
    }

    #[test]
    fn test_changes_serialize_only_set_fields() {
        let changes = SwarmChanges {
            version: Some("v2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            serde_json::json!({"version": "v2"})
        );
        assert!(SwarmChanges::default().is_empty());
    }

    #[test]
    fn test_tag_token() {
        assert_eq!(TagToken::parse("-"), TagToken::Keep);
        assert_eq!(TagToken::parse("-").version(), None);
        assert_eq!(TagToken::parse("1.2.3").version().as_deref(), Some("1.2.3"));
    }
}
