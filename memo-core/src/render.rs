//! Narrative rendering of memo records.
//!
//! The hover surface and the exported `.md` artifact both consume this
//! output, so it must stay byte-deterministic for a given record.

use std::path::Path;

use crate::types::MemoRecord;

/// Renders one record as its narrative Markdown block: the memo text, a
/// link to the local file at the start line, optionally the remote
/// permalink with a line/character suffix, then the captured text in a
/// fenced code block tagged with the file's extension.
pub fn render_markdown(record: &MemoRecord) -> String {
    let mut out = format!("{}  \n", record.memo);
    out.push_str(&format!(
        "[[file]({}#L{})]",
        record.file_path,
        record.start_line + 1
    ));
    if let Some(link) = &record.remote_link {
        out.push_str(&format!(
            " [[GitHub]({link}#L{}C{}-L{}C{})]",
            record.start_line + 1,
            record.start_character + 1,
            record.end_line + 1,
            record.end_character + 1
        ));
    }
    out.push_str("\n\n");
    out.push_str(&format!(
        "```{}\n{}\n```\n",
        file_extension(&record.file_path),
        record.selected_text
    ));
    out
}

/// Truncates to at most `max_chars` characters, appending `...` only when
/// something was cut. Operates on chars, never mid-code-point.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{head}...")
}

fn file_extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}
