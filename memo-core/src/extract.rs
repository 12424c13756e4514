//! Builds a memo record from a live editor selection.

use crate::remote::RemoteLinkLookup;
use crate::types::MemoRecord;
use crate::types::Span;
use crate::types::new_record_id;

/// Line-indexed access to the document a selection lives in.
pub trait FileContext {
    /// Project-relative path of the document.
    fn relative_path(&self) -> String;
    /// Text of a zero-based line, without the trailing newline. `None`
    /// past the end of the document.
    fn line(&self, line: u32) -> Option<String>;
}

/// Captures the selection into a fresh record. The snapshot covers whole
/// lines for every line the span touches, joined with newlines, even where
/// the selection ends mid-line. The permalink comes from the injected
/// lookup and is stored verbatim; lookup failure simply leaves it absent.
pub fn build_record(
    memo_text: &str,
    file: &(impl FileContext + ?Sized),
    span: Span,
    remote: &dyn RemoteLinkLookup,
) -> MemoRecord {
    let file_path = file.relative_path();
    let mut lines = Vec::new();
    for line in span.start_line..=span.end_line {
        match file.line(line) {
            Some(text) => lines.push(text),
            None => break,
        }
    }
    MemoRecord {
        id: new_record_id(),
        remote_link: remote.lookup(&file_path),
        file_path,
        start_line: span.start_line,
        start_character: span.start_character,
        end_line: span.end_line,
        end_character: span.end_character,
        memo: memo_text.to_string(),
        selected_text: lines.join("\n"),
    }
}
