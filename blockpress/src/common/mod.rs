//! Format-independent transformations shared by every renderer.
//!
//! [`rich_text`] turns annotated spans into nested inline nodes, and
//! [`grouping`] folds sibling list items into lists.

pub mod grouping;
pub mod rich_text;
