//! Renderer implementations
//!
//! Each renderer maps resolved blocks to its own output node type through
//! the [`Renderer`](crate::render::Renderer) trait.

pub mod html;
pub mod tree;
