//! Data model for memo records and memo sets.

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Zero-based selection span. The end position is inclusive of the last
/// covered character on `end_line`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

/// One persisted memo with its code-location anchor.
///
/// Field names serialize in camelCase; this is the exact on-disk record
/// shape, so the field set must not grow without a format decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoRecord {
    pub id: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_link: Option<String>,
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
    pub memo: String,
    pub selected_text: String,
}

impl MemoRecord {
    /// The anchored selection span.
    pub fn span(&self) -> Span {
        Span {
            start_line: self.start_line,
            start_character: self.start_character,
            end_line: self.end_line,
            end_character: self.end_character,
        }
    }
}

/// A record tagged with the memo set it belongs to. Membership is fixed at
/// add time and carried through updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoEntry {
    pub set_title: String,
    pub record: MemoRecord,
}

/// Fresh record id, unique across the store for any practical memo count.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Makes a user-chosen set title safe as a file-name stem.
pub fn normalize_set_title(title: &str) -> String {
    title.replace(['/', '\\'], "_")
}
