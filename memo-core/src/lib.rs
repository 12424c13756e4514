//! Core persistence and reconciliation for code-reading memos.
//!
//! A memo anchors a free-text note to a span of source code. This crate
//! owns the in-memory index of memos (grouped by file and by memo set),
//! the per-set on-disk artifacts, and the reflection of store state onto
//! open editors as inline overlays and actionable lenses. The host editor
//! is consumed through narrow capability traits ([`extract::FileContext`],
//! [`reflect::OverlayHost`], [`remote::RemoteLinkLookup`]) so the core
//! stays testable without an editor process.

pub mod config;
pub mod error;
pub mod extract;
pub mod persist;
pub mod reflect;
pub mod remote;
pub mod render;
pub mod store;
pub mod types;

pub use config::Settings;
pub use error::MemoError;
pub use persist::MemoFiles;
pub use reflect::Reflector;
pub use store::MemoStore;
pub use types::MemoEntry;
pub use types::MemoRecord;
pub use types::Span;
