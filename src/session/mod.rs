//! Browser session pipeline.
//!
//! Loading a session goes through up to four stages:
//!
//! 1. [`container`] - unwrap the Firefox `mozLz40` block (Firefox only)
//! 2. [`codec`] - parse JSON or YAML into a [`SessionTree`]
//! 3. [`fix`] - optional repair of error pages and active markers
//! 4. [`outline`] - write a native dump or an Org outline
//!
//! Each stage owns the tree while it works on it and fails fast; nothing
//! is retried and nothing partial is returned.

pub mod codec;
pub mod container;
mod error;
mod fix;
mod model;
pub mod outline;

pub use codec::Format;
pub use error::{FormatError, HeaderBytes, ParseError, Result, SessionError};
pub use fix::fix;
pub use model::{
    Geometry, HistoryEntry, ScrollPos, SessionTree, Tab, Window, ERROR_PAGE_TITLE_PREFIX,
    EXTENSION_URL_PREFIX, PLACEHOLDER_URL_PREFIX,
};
pub use outline::{dump, render, Layout, RenderOptions, Selection};
