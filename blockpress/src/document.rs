//! Document assembly: page metadata plus rendered body.

use crate::error::Error;
use crate::model::{PageRecord, PropertyNames};
use serde::Serialize;

/// Metadata read from a page's properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub slug: String,
    pub title: String,
    pub published: bool,
    /// Creation day, `YYYY-MM-DD`.
    pub created_at: String,
}

/// A rendered document. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<N> {
    pub id: String,
    #[serde(flatten)]
    pub metadata: PageMetadata,
    pub body: Vec<N>,
}

/// Read the metadata of `page`.
///
/// Every property is required: a missing or wrongly shaped property is a
/// [`Error::MalformedRecord`] naming it.
pub fn page_metadata(page: &PageRecord, names: &PropertyNames) -> Result<PageMetadata, Error> {
    let slug = page
        .text_property(&names.slug)
        .map_err(|err| Error::malformed(&names.slug, err.to_string()))?;
    let title = page
        .text_property(&names.title)
        .map_err(|err| Error::malformed(&names.title, err.to_string()))?;
    let published = page
        .checkbox_property(&names.published)
        .map_err(|err| Error::malformed(&names.published, err.to_string()))?;
    let created_time = page
        .created_time
        .as_deref()
        .ok_or_else(|| Error::malformed("created_time", "is missing"))?;
    let created_at = calendar_day(created_time)
        .ok_or_else(|| {
            Error::malformed(
                "created_time",
                format!("is not an ISO-8601 timestamp: '{created_time}'"),
            )
        })?
        .to_string();

    Ok(PageMetadata {
        slug,
        title,
        published,
        created_at,
    })
}

/// Combine a page record and its rendered body.
pub fn assemble<N>(
    page: &PageRecord,
    body: Vec<N>,
    names: &PropertyNames,
) -> Result<Document<N>, Error> {
    Ok(Document {
        id: page.id.clone(),
        metadata: page_metadata(page, names)?,
        body,
    })
}

/// The `YYYY-MM-DD` part of an ISO-8601 timestamp.
pub fn calendar_day(timestamp: &str) -> Option<&str> {
    let day = timestamp.split('T').next()?;
    let bytes = day.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    well_formed.then_some(day)
}
