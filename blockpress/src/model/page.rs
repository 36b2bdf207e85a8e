//! Page records returned by the page resolver.
//!
//! Page properties are kept as raw JSON so that a property of the wrong
//! shape surfaces as a malformed-record error at assembly time instead of
//! failing the whole query.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A full page record: identifier, creation timestamp and named properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRecord {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

/// Why a property could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    Missing,
    WrongShape(&'static str),
    Empty,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::Missing => write!(f, "is missing"),
            PropertyError::WrongShape(expected) => write!(f, "is not a {expected} property"),
            PropertyError::Empty => write!(f, "is empty"),
        }
    }
}

impl PageRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            created_time: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// First plain text of a `title` or `rich_text` property.
    pub fn text_property(&self, name: &str) -> Result<String, PropertyError> {
        let value = self.property(name).ok_or(PropertyError::Missing)?;
        let spans = value
            .get("title")
            .or_else(|| value.get("rich_text"))
            .and_then(Value::as_array)
            .ok_or(PropertyError::WrongShape("text"))?;
        let first = spans.first().ok_or(PropertyError::Empty)?;
        first
            .get("plain_text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(PropertyError::WrongShape("text"))
    }

    pub fn checkbox_property(&self, name: &str) -> Result<bool, PropertyError> {
        self.property(name)
            .ok_or(PropertyError::Missing)?
            .get("checkbox")
            .and_then(Value::as_bool)
            .ok_or(PropertyError::WrongShape("checkbox"))
    }

    /// Builder used by fixtures: set a title-typed property.
    pub fn with_title_property(mut self, name: &str, text: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({ "type": "title", "title": [{ "type": "text", "plain_text": text }] }),
        );
        self
    }

    /// Builder used by fixtures: set a rich-text property.
    pub fn with_text_property(mut self, name: &str, text: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({ "type": "rich_text", "rich_text": [{ "type": "text", "plain_text": text }] }),
        );
        self
    }

    /// Builder used by fixtures: set a checkbox property.
    pub fn with_checkbox_property(mut self, name: &str, checked: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({ "type": "checkbox", "checkbox": checked }),
        );
        self
    }

    pub fn with_created_time(mut self, timestamp: &str) -> Self {
        self.created_time = Some(timestamp.to_string());
        self
    }
}

/// Names of the page properties that hold document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub slug: String,
    pub title: String,
    pub published: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            slug: "slug".to_string(),
            title: "title".to_string(),
            published: "published".to_string(),
        }
    }
}
