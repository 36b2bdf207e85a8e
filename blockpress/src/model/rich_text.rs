//! Inline rich-text spans.

use serde::Deserialize;

/// What kind of inline object a span is.
///
/// Only `Text` spans carry styling; mentions, equations and anything newer
/// fall back to their plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    #[default]
    Text,
    Mention,
    Equation,
    #[serde(other)]
    Other,
}

/// Independent style flags plus an optional named color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Option<String>,
}

impl Annotations {
    /// The color to apply, or `None` for the store's `default` color.
    pub fn effective_color(&self) -> Option<&str> {
        self.color
            .as_deref()
            .filter(|color| !color.is_empty() && *color != "default")
    }
}

/// A run of text carrying style annotations and an optional link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default)]
    pub kind: SpanKind,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    pub fn plain(text: &str) -> Self {
        Self {
            kind: SpanKind::Text,
            plain_text: text.to_string(),
            href: None,
            annotations: Annotations::default(),
        }
    }

    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.annotations.underline = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn with_link(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.annotations.color = Some(color.to_string());
        self
    }
}

/// Concatenate the plain text of a run of spans.
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}
