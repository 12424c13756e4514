//! On-disk artifacts for memo sets.
//!
//! Each set materializes as two files in the project root: the structured
//! record file `<title>.<suffix>.json` and the regenerated narrative file
//! `<title>.<suffix>.md`. Every write is a whole-file overwrite of the
//! set's current authoritative record list; update and delete rewrite
//! history, so an append-only log cannot represent them.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::MemoError;
use crate::render::render_markdown;
use crate::types::MemoRecord;
use crate::types::normalize_set_title;

/// Persistence gateway for one project root and suffix token.
pub struct MemoFiles {
    project_root: PathBuf,
    suffix: String,
}

/// Result of startup discovery: every parseable set (titles sorted, record
/// order as on disk) plus the files that were skipped as malformed.
pub struct LoadedSets {
    pub sets: Vec<(String, Vec<MemoRecord>)>,
    pub skipped: Vec<PathBuf>,
}

/// Paths produced by a set write, for hosts that offer to open them.
pub struct WrittenSet {
    pub structured: PathBuf,
    pub narrative: PathBuf,
}

impl MemoFiles {
    pub fn new(project_root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            suffix: suffix.into(),
        }
    }

    /// Titles of the memo sets present in the project root, sorted.
    pub fn set_titles(&self) -> Result<Vec<String>, MemoError> {
        let marker = format!(".{}.json", self.suffix);
        let dir = fs::read_dir(&self.project_root).map_err(|source| MemoError::ReadDir {
            dir: self.project_root.clone(),
            source,
        })?;
        let mut titles = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|source| MemoError::ReadDir {
                dir: self.project_root.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(title) = name.strip_suffix(&marker) {
                titles.push(title.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    /// Reads every record file in the project root. One malformed file
    /// does not abort the rest: it is logged, reported through
    /// `LoadedSets::skipped` and left untouched on disk.
    pub fn load_all(&self) -> Result<LoadedSets, MemoError> {
        let mut sets = Vec::new();
        let mut skipped = Vec::new();
        for title in self.set_titles()? {
            let path = self.structured_path(&title);
            let data = match fs::read_to_string(&path) {
                Ok(data) => data,
                // Listed but gone by the time we read it; nothing to load.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(MemoError::ReadFile { path, source }),
            };
            match serde_json::from_str::<Vec<MemoRecord>>(&data) {
                Ok(records) => sets.push((title, records)),
                Err(err) => {
                    warn!("skipping malformed memo file {}: {err}", path.display());
                    skipped.push(path);
                }
            }
        }
        Ok(LoadedSets { sets, skipped })
    }

    /// Overwrites both artifacts of one set with the given complete record
    /// list. An empty list writes `[]` and a heading-only narrative, so a
    /// fully emptied set stays discoverable rather than vanishing.
    pub fn write_set(
        &self,
        set_title: &str,
        records: &[MemoRecord],
    ) -> Result<WrittenSet, MemoError> {
        let structured = self.structured_path(set_title);
        let narrative = self.narrative_path(set_title);

        let json = serde_json::to_string_pretty(records)?;
        fs::write(&structured, json).map_err(|source| MemoError::WriteFile {
            path: structured.clone(),
            source,
        })?;

        let blocks: Vec<String> = records.iter().map(render_markdown).collect();
        let document = format!("# {set_title}\n{}", blocks.join("\n"));
        fs::write(&narrative, document).map_err(|source| MemoError::WriteFile {
            path: narrative.clone(),
            source,
        })?;

        Ok(WrittenSet {
            structured,
            narrative,
        })
    }

    /// Path of a set's structured record file.
    pub fn structured_path(&self, set_title: &str) -> PathBuf {
        self.artifact_path(set_title, "json")
    }

    /// Path of a set's narrative export.
    pub fn narrative_path(&self, set_title: &str) -> PathBuf {
        self.artifact_path(set_title, "md")
    }

    fn artifact_path(&self, set_title: &str, ext: &str) -> PathBuf {
        self.project_root.join(format!(
            "{}.{}.{ext}",
            normalize_set_title(set_title),
            self.suffix
        ))
    }
}
