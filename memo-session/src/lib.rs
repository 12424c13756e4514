//! Host-facing command layer for code-reading memos.
//!
//! Wires the interactive prompts, the coordinate extractor, the memo
//! store, the persistence gateway and the reflection engine into the
//! discrete handlers a host editor invokes: create a memo set, add a memo
//! on the current selection, update or remove a memo from a lens, and
//! refresh overlays when a document opens. Each handler runs to
//! completion; the only suspension points are the prompts, and a
//! dismissed prompt aborts the handler with no state change.

pub mod host;
mod session;

pub use host::EditorSurface;
pub use host::Prompter;
pub use session::Session;
