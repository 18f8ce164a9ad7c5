//! Token payload

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved claim holding the expiration instant (Unix seconds)
pub const EXP_CLAIM: &str = "exp";
/// Conventional subject claim
pub const SUB_CLAIM: &str = "sub";

/// Claims carried by a session token
///
/// An insertion-ordered map of caller-defined keys. The token service owns
/// `exp` and overwrites it on issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Subject (`sub`), if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.0.get(SUB_CLAIM).and_then(Value::as_str)
    }

    /// Expiration as Unix seconds
    ///
    /// Fractional timestamps written by other issuers are truncated toward the past.
    pub fn exp(&self) -> Option<i64> {
        match self.0.get(EXP_CLAIM)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp()
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }

    /// A token is expired once `now` reaches `exp`. Claims without a usable
    /// `exp` never report as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp().is_some_and(|exp| now.timestamp() >= exp)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn exp_formatted(&self) -> Option<String> {
        let local: DateTime<Local> = self.expires_at()?.into();
        Some(local.format("%Y-%m-%d %H:%M:%S %Z").to_string())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Claims> for Map<String, Value> {
    fn from(claims: Claims) -> Self {
        claims.0
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Claims {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Claims {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_insertion_order() {
        let claims = Claims::new()
            .with("sub", "user-42")
            .with("role", "admin")
            .with("age", 30);

        let keys: Vec<&str> = claims.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["sub", "role", "age"]);
        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"sub":"user-42","role":"admin","age":30}"#
        );
    }

    #[test]
    fn test_subject() {
        assert_eq!(Claims::new().with("sub", "user-42").subject(), Some("user-42"));
        assert_eq!(Claims::new().with("sub", 42).subject(), None);
        assert_eq!(Claims::new().subject(), None);
    }

    #[test]
    fn test_exp_parsing() {
        assert_eq!(Claims::new().with("exp", 1_700_000_000).exp(), Some(1_700_000_000));
        assert_eq!(Claims::new().with("exp", 1_700_000_000.9).exp(), Some(1_700_000_000));
        assert_eq!(Claims::new().with("exp", "tomorrow").exp(), None);
        assert_eq!(Claims::new().exp(), None);
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let claims = Claims::new().with("exp", 1_700_000_000);
        let at = |secs| DateTime::<Utc>::from_timestamp(secs, 0).unwrap();

        assert!(!claims.is_expired_at(at(1_699_999_999)));
        assert!(claims.is_expired_at(at(1_700_000_000)));
        assert!(claims.is_expired_at(at(1_700_000_001)));
        assert!(!Claims::new().is_expired_at(at(1_700_000_000)));
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut claims = Claims::new()
            .with("a", 1)
            .with("exp", 2)
            .with("b", 3);

        assert_eq!(claims.remove("exp"), Some(json!(2)));
        let keys: Vec<String> = claims.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_deserialize_from_object() {
        let claims: Claims = serde_json::from_value(json!({"sub": "x", "exp": 10})).unwrap();
        assert_eq!(claims.subject(), Some("x"));
        assert_eq!(claims.exp(), Some(10));
        assert!(serde_json::from_value::<Claims>(json!([1, 2])).is_err());
    }
}
