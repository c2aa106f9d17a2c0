use crate::error::{BoardError, Result};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

/// Name given to the tab that collects shortcuts not assigned elsewhere.
pub const DEFAULT_TAB_NAME: &str = "Ungrouped";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub name: String,
    /// Ordered member shortcut ids.
    #[serde(default)]
    pub shortcuts: Vec<String>,
    /// Marks the single default tab. Set once when the tab is synthesised and
    /// never derived from the name afterwards.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_default: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            shortcuts: Vec::new(),
            is_default: false,
        }
    }

    pub fn new_default() -> Self {
        Self {
            is_default: true,
            ..Self::new(DEFAULT_TAB_NAME)
        }
    }

    pub fn contains(&self, shortcut_id: &str) -> bool {
        self.shortcuts.iter().any(|s| s == shortcut_id)
    }
}

/// Unique id: milliseconds since the epoch in base 36 followed by a random
/// alphanumeric suffix.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Trim `value`, failing when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::Validation(field));
    }
    Ok(trimmed.to_string())
}

/// Prefix `https://` unless the url already carries an `http(s)://` scheme.
pub fn normalize_url(url: &str) -> Result<String> {
    let url = required("url", url)?;
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(url)
    } else {
        Ok(format!("https://{url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(normalize_url(" http://a.b ").unwrap(), "http://a.b");
        assert_eq!(normalize_url("HTTPS://A.B").unwrap(), "HTTPS://A.B");
    }

    #[test]
    fn normalize_rejects_blank() {
        assert!(matches!(normalize_url("   "), Err(BoardError::Validation("url"))));
    }

    #[test]
    fn ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.contains('-'));
    }

    #[test]
    fn default_flag_is_omitted_when_false() {
        let tab = Tab {
            id: "t".into(),
            name: "Work".into(),
            shortcuts: vec![],
            is_default: false,
        };
        let json = serde_json::to_value(&tab).unwrap();
        assert!(json.get("isDefault").is_none());
        let tab = Tab { is_default: true, ..tab };
        let json = serde_json::to_value(&tab).unwrap();
        assert_eq!(json["isDefault"], serde_json::json!(true));
    }
}
