//! Decoding of the store's JSON wire shapes.
//!
//! Blocks arrive as objects with a `type` tag and the kind's payload under a
//! key of the same name:
//!
//! ```text
//! { "id": "b1", "type": "paragraph", "has_children": false,
//!   "paragraph": { "rich_text": [ ... ] } }
//! ```
//!
//! Entries without a `type`, and entries flagged as archived or trashed, are
//! stubs the caller has no access to and decode as [`BlockEntry::Partial`].
//! Pages without `properties` are likewise partial and decode as `None`.

use crate::error::SourceError;
use crate::model::{BlockId, BlockKind, BlockRecord, PageRecord, UnsupportedBlock};
use crate::source::BlockEntry;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    has_children: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    in_trash: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

/// Decode one block object.
pub fn decode_block(value: Value) -> Result<BlockEntry, SourceError> {
    let mut raw: RawBlock = serde_json::from_value(value).map_err(|source| SourceError::Decode {
        context: "block".to_string(),
        source,
    })?;
    let kind = match raw.kind.take() {
        Some(kind) if !raw.archived && !raw.in_trash => kind,
        _ => return Ok(BlockEntry::Partial { id: raw.id }),
    };
    let payload = raw.payload.remove(&kind).unwrap_or(Value::Null);
    let context = format!("{kind} block {}", raw.id);
    let kind = decode_kind(&kind, payload, &context)?;
    Ok(BlockEntry::Full(BlockRecord {
        id: raw.id,
        has_children: raw.has_children,
        kind,
    }))
}

fn decode_kind(kind: &str, payload: Value, context: &str) -> Result<BlockKind, SourceError> {
    let kind = match kind {
        "heading_1" => BlockKind::Heading1(payload_of(payload, context)?),
        "heading_2" => BlockKind::Heading2(payload_of(payload, context)?),
        "heading_3" => BlockKind::Heading3(payload_of(payload, context)?),
        "paragraph" => BlockKind::Paragraph(payload_of(payload, context)?),
        "bulleted_list_item" => BlockKind::BulletedListItem(payload_of(payload, context)?),
        "numbered_list_item" => BlockKind::NumberedListItem(payload_of(payload, context)?),
        "quote" => BlockKind::Quote(payload_of(payload, context)?),
        "code" => BlockKind::Code(payload_of(payload, context)?),
        "divider" => BlockKind::Divider,
        "image" => BlockKind::Image(payload_of(payload, context)?),
        "table" => BlockKind::Table(payload_of(payload, context)?),
        "table_row" => BlockKind::TableRow(payload_of(payload, context)?),
        "child_page" => BlockKind::ChildPage(payload_of(payload, context)?),
        "bookmark" => BlockKind::Bookmark(payload_of(payload, context)?),
        other => BlockKind::Unsupported(UnsupportedBlock {
            kind: other.to_string(),
        }),
    };
    Ok(kind)
}

fn payload_of<T: DeserializeOwned>(payload: Value, context: &str) -> Result<T, SourceError> {
    serde_json::from_value(payload).map_err(|source| SourceError::Decode {
        context: context.to_string(),
        source,
    })
}

/// Decode a JSON array of block objects.
pub fn decode_blocks(text: &str, context: &str) -> Result<Vec<BlockEntry>, SourceError> {
    let values: Vec<Value> = serde_json::from_str(text).map_err(|source| SourceError::Decode {
        context: context.to_string(),
        source,
    })?;
    values.into_iter().map(decode_block).collect()
}

/// Decode one page object; partial pages decode as `None`.
pub fn decode_page(value: Value) -> Result<Option<PageRecord>, SourceError> {
    if value.get("properties").is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| SourceError::Decode {
            context: "page".to_string(),
            source,
        })
}

/// Decode a JSON array of page objects, dropping partial pages.
pub fn decode_pages(text: &str, context: &str) -> Result<Vec<PageRecord>, SourceError> {
    let values: Vec<Value> = serde_json::from_str(text).map_err(|source| SourceError::Decode {
        context: context.to_string(),
        source,
    })?;
    let mut pages = Vec::with_capacity(values.len());
    for value in values {
        if let Some(page) = decode_page(value)? {
            pages.push(page);
        }
    }
    Ok(pages)
}
