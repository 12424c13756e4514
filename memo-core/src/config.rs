//! Configuration values supplied to the core as plain data.

/// Default file-name suffix token: memo sets live in
/// `<title>.code_memo.json` / `<title>.code_memo.md`.
pub const DEFAULT_FILE_SUFFIX: &str = "code_memo";

const FILE_SUFFIX_ENV: &str = "CODE_MEMO_FILE_SUFFIX";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub file_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
        }
    }
}

impl Settings {
    /// Honors `CODE_MEMO_FILE_SUFFIX` when set and non-empty; hosts that
    /// carry their own configuration surface just build `Settings`
    /// directly instead.
    pub fn from_env() -> Self {
        match std::env::var(FILE_SUFFIX_ENV) {
            Ok(suffix) if !suffix.trim().is_empty() => Self {
                file_suffix: suffix.trim().to_string(),
            },
            _ => Self::default(),
        }
    }
}
