//! Typed content blocks.

use super::rich_text::{plain_text, RichText};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a block (or of a page, which is the root parent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        BlockId::new(id)
    }
}

/// A fully resolved block record as delivered by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub id: BlockId,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl BlockRecord {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
        }
    }

    /// Mark the record as owning children in the store.
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        BlockId(id)
    }
}

/// The content kinds a block can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    Paragraph(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    Quote(TextBlock),
    Code(CodeBlock),
    Divider,
    Image(ImageBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ChildPage(ChildPageBlock),
    Bookmark(BookmarkBlock),
    Unsupported(UnsupportedBlock),
}

/// Payload-free discriminant of [`BlockKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletedListItem,
    NumberedListItem,
    Quote,
    Code,
    Divider,
    Image,
    Table,
    TableRow,
    ChildPage,
    Bookmark,
    Unsupported,
}

impl BlockType {
    /// The store's wire name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::Paragraph => "paragraph",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::Table => "table",
            BlockType::TableRow => "table_row",
            BlockType::ChildPage => "child_page",
            BlockType::Bookmark => "bookmark",
            BlockType::Unsupported => "unsupported",
        }
    }
}

/// The two list flavours that consecutive list items are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Bulleted => "bulleted_list",
            ListKind::Numbered => "numbered_list",
        }
    }
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Heading1(_) => BlockType::Heading1,
            BlockKind::Heading2(_) => BlockType::Heading2,
            BlockKind::Heading3(_) => BlockType::Heading3,
            BlockKind::Paragraph(_) => BlockType::Paragraph,
            BlockKind::BulletedListItem(_) => BlockType::BulletedListItem,
            BlockKind::NumberedListItem(_) => BlockType::NumberedListItem,
            BlockKind::Quote(_) => BlockType::Quote,
            BlockKind::Code(_) => BlockType::Code,
            BlockKind::Divider => BlockType::Divider,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::Table(_) => BlockType::Table,
            BlockKind::TableRow(_) => BlockType::TableRow,
            BlockKind::ChildPage(_) => BlockType::ChildPage,
            BlockKind::Bookmark(_) => BlockType::Bookmark,
            BlockKind::Unsupported(_) => BlockType::Unsupported,
        }
    }

    /// The list this block belongs to, if it is a list item.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            BlockKind::BulletedListItem(_) => Some(ListKind::Bulleted),
            BlockKind::NumberedListItem(_) => Some(ListKind::Numbered),
            _ => None,
        }
    }

    /// Inline text carried by text-like blocks.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            BlockKind::Heading1(text)
            | BlockKind::Heading2(text)
            | BlockKind::Heading3(text)
            | BlockKind::Paragraph(text)
            | BlockKind::BulletedListItem(text)
            | BlockKind::NumberedListItem(text)
            | BlockKind::Quote(text) => Some(&text.rich_text),
            BlockKind::Code(code) => Some(&code.rich_text),
            _ => None,
        }
    }
}

/// Payload shared by headings, paragraphs, list items and quotes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextBlock {
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self { rich_text }
    }

    /// A single unstyled span.
    pub fn plain(text: &str) -> Self {
        Self::new(vec![RichText::plain(text)])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl CodeBlock {
    /// Language tag to highlight with.
    ///
    /// A non-empty caption overrides the declared language, which lets
    /// authors name languages the store does not offer.
    pub fn effective_language(&self) -> String {
        let caption = plain_text(&self.caption);
        let caption = caption.trim();
        if caption.is_empty() {
            self.language.clone()
        } else {
            caption.to_string()
        }
    }

    pub fn source(&self) -> String {
        plain_text(&self.rich_text)
    }
}

/// Where an image's bytes live.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Hot-linked from a third party; rendered as-is.
    External { url: String },
    /// Hosted by the store behind an expiring URL; mirrored locally.
    File {
        url: String,
        expiry_time: Option<String>,
    },
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::External { url } | ImageSource::File { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawImage")]
pub struct ImageBlock {
    pub source: ImageSource,
    pub caption: Vec<RichText>,
}

impl ImageBlock {
    pub fn external(url: &str) -> Self {
        Self {
            source: ImageSource::External {
                url: url.to_string(),
            },
            caption: Vec::new(),
        }
    }

    pub fn hosted(url: &str) -> Self {
        Self {
            source: ImageSource::File {
                url: url.to_string(),
                expiry_time: None,
            },
            caption: Vec::new(),
        }
    }

    pub fn caption_text(&self) -> String {
        plain_text(&self.caption)
    }
}

#[derive(Deserialize)]
struct RawImage {
    #[serde(rename = "type")]
    kind: String,
    external: Option<RawUrl>,
    file: Option<RawHostedFile>,
    #[serde(default)]
    caption: Vec<RichText>,
}

#[derive(Deserialize)]
struct RawUrl {
    url: String,
}

#[derive(Deserialize)]
struct RawHostedFile {
    url: String,
    expiry_time: Option<String>,
}

impl TryFrom<RawImage> for ImageBlock {
    type Error = String;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        let source = match (raw.kind.as_str(), raw.external, raw.file) {
            ("external", Some(external), _) => ImageSource::External { url: external.url },
            ("file", _, Some(file)) => ImageSource::File {
                url: file.url,
                expiry_time: file.expiry_time,
            },
            (kind, _, _) => return Err(format!("image of type '{kind}' has no matching payload")),
        };
        Ok(ImageBlock {
            source,
            caption: raw.caption,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableBlock {
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

/// One row of a table; each cell is a run of rich text.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TableRowBlock {
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChildPageBlock {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookmarkBlock {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// A kind the store delivered that has no dedicated variant.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedBlock {
    pub kind: String,
}
