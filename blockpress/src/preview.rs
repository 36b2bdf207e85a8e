//! Open Graph link previews for bookmark blocks.
//!
//! The target page is fetched through the [`Fetch`] collaborator and parsed
//! with html5ever; `<meta property="og:*">` tags supply the card's title,
//! description and image. The favicon is assumed at `/favicon.ico` on the
//! target's host.

use crate::error::AssetError;
use crate::fetch::Fetch;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;
use url::Url;

/// Maximum characters of description shown on a card.
pub const DESCRIPTION_LIMIT: usize = 80;
/// Maximum characters of the URL shown on a card.
pub const URL_LIMIT: usize = 40;

/// Card data for a bookmarked page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkPreview {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
}

impl LinkPreview {
    /// Description cut to [`DESCRIPTION_LIMIT`] characters, with an
    /// ellipsis when something was cut.
    pub fn short_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(|text| truncate(text, DESCRIPTION_LIMIT))
    }

    /// URL cut to [`URL_LIMIT`] characters.
    pub fn short_url(&self) -> String {
        truncate(&self.url, URL_LIMIT)
    }
}

/// Fetch `url` and build its preview.
pub fn fetch_preview(fetcher: &dyn Fetch, url: &str) -> Result<LinkPreview, AssetError> {
    let parsed = Url::parse(url).map_err(|_| AssetError::InvalidUrl(url.to_string()))?;
    let bytes = fetcher.fetch(&parsed)?;
    let mut preview = parse_open_graph(&String::from_utf8_lossy(&bytes));
    preview.url = url.to_string();
    preview.favicon = parsed
        .host_str()
        .map(|host| format!("{}://{host}/favicon.ico", parsed.scheme()));
    Ok(preview)
}

/// Extract `og:title`, `og:description` and `og:image` from an HTML page.
///
/// Later tags win over earlier ones with the same property. The returned
/// preview has an empty `url`.
pub fn parse_open_graph(html: &str) -> LinkPreview {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut tags = HashMap::new();
    collect_og_tags(&dom.document, &mut tags);
    LinkPreview {
        title: tags.remove("title"),
        description: tags.remove("description"),
        image: tags.remove("image"),
        ..LinkPreview::default()
    }
}

fn collect_og_tags(node: &Handle, tags: &mut HashMap<String, String>) {
    if let NodeData::Element { name, attrs, .. } = &node.data {
        if &*name.local == "meta" {
            let attrs = attrs.borrow();
            let value_of = |key: &str| {
                attrs
                    .iter()
                    .find(|attr| &*attr.name.local == key)
                    .map(|attr| String::from(&*attr.value))
            };
            if let (Some(property), Some(content)) = (value_of("property"), value_of("content"))
            {
                if let Some(key) = property.strip_prefix("og:") {
                    if !content.is_empty() {
                        tags.insert(key.to_string(), content);
                    }
                }
            }
        }
    }
    for child in node.children.borrow().iter() {
        collect_og_tags(child, tags);
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("...");
    cut
}
