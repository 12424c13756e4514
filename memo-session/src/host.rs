//! Capability surface the host editor implements for the session layer.

use memo_core::extract::FileContext;
use memo_core::types::Span;

/// Interactive prompt surface. `None` models a dismissed prompt; handlers
/// treat it as a no-op abort.
pub trait Prompter {
    /// Single line of free text.
    fn input(&self, prompt: &str) -> Option<String>;
    /// Choice among `options`.
    fn pick(&self, placeholder: &str, options: &[String]) -> Option<String>;
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// The live editor a selection-based command runs against.
pub trait EditorSurface: FileContext {
    /// Current selection span, zero-based.
    fn selection(&self) -> Span;
}
