//! Block-tree publishing engine
//!
//!     This crate renders documents held in a remote block store (pages of typed content
//!     blocks, nested, paginated at every level) into an output tree: HTML, or a structured
//!     tree that serializes to JSON.
//!
//!     TLDR: For renderer authors:
//!         - The engine never talks to the network. Blocks and pages come in through the
//!           collaborator traits in ./source, bytes through ./fetch.
//!         - A renderer implements the Renderer trait (./render.rs): one method for a standalone
//!           block, one for a grouped list. Children always arrive already rendered.
//!         - Inline text goes through common::rich_text::compose, never through ad hoc wrapping,
//!           so every renderer nests annotations the same way.
//!
//! Architecture
//!
//!     The format-agnostic work lives in the core (./tree.rs, ./common), and renderers only
//!     map one resolved block to one output node. The pipeline for a document is:
//!
//!         Publisher → PageResolver (find the page)
//!                   → TreeBuilder (walk the block tree, depth first)
//!                       → BlockSource pages → BlockGrouper → Renderer
//!                                                               → compose / AssetMirror
//!                   → assemble (page metadata + body)
//!
//!     This is a pure lib: it powers blockpress-cli but is shell agnostic. No code here
//!     prints, reads env vars or parses arguments.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model                   # Blocks, rich text, page records
//!     ├── source                  # BlockSource / PageResolver traits, JSON decoding, export dirs
//!     ├── common
//!     │   ├── rich_text.rs        # Inline composition
//!     │   └── grouping.rs         # List grouping
//!     ├── tree.rs                 # Depth-first traversal
//!     ├── render.rs               # Renderer trait and render context
//!     ├── formats
//!     │   ├── html                # rcdom / html5ever renderer
//!     │   └── tree                # serde renderer
//!     ├── assets.rs               # Local mirror of hosted images
//!     ├── fetch.rs                # Byte transport
//!     ├── preview.rs              # Bookmark link previews
//!     ├── document.rs             # Metadata + body
//!     └── publish.rs              # Publisher
//!
//! Testing
//!     tests
//!     ├── common                  # Fake collaborators and fixtures
//!     ├── tree                    # Traversal
//!     ├── publish                 # End to end
//!     ├── assets                  # Mirror behaviour
//!     └── html                    # Rendered output
//!
//!     Rust does not discover tests in subdirectories by default, so they are wired through
//!     tests/lib.rs.
//!
//! Core Algorithms
//!
//!     Three small algorithms carry the engine, each in its own module with its own tests:
//!     the depth-first traversal that resolves children before their parent is rendered
//!     (./tree.rs), the run-length grouping of list items (./common/grouping.rs), and the fixed
//!     order inline composition (./common/rich_text.rs).
//!
//! Library Choices
//!
//!     HTML is built as an rcdom tree and serialized with html5ever, which also parses pages for
//!     link previews. Wire records are decoded with serde_json. Asset names are derived with sha2,
//!     written through tempfile for atomic renames.
//!
pub mod assets;
pub mod common;
pub mod document;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod model;
pub mod preview;
pub mod publish;
pub mod render;
pub mod source;
pub mod tree;

pub use assets::{AssetMirror, AssetNaming, LocalAsset, MirrorOptions};
pub use common::grouping::{group_siblings, BlockGrouper, Grouped, GroupedList};
pub use common::rich_text::{compose, ComposedSpan, InlineNode};
pub use document::{assemble, Document, PageMetadata};
pub use error::{AssetError, Error, SourceError};
pub use fetch::{Fetch, LocalFetcher};
pub use formats::html::HtmlRenderer;
pub use formats::tree::{RenderedNode, TreeRenderer};
pub use model::PropertyNames;
pub use publish::Publisher;
pub use render::{RenderContext, RenderOptions, Renderer, UnsupportedPolicy};
pub use source::export::ExportSource;
pub use source::{BlockSource, PageFilter, PageResolver, PageSort};
pub use tree::TreeBuilder;
