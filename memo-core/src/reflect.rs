//! Reflection of store state onto open editors.
//!
//! Per open file the engine owns a bag of applied overlay handles: one
//! inline label and one highlighted region per record. A refresh detaches
//! every handle in the file's bag before rebuilding, unconditionally, so
//! repeated refreshes never duplicate overlays and a deleted memo's
//! overlay disappears even when the new record list is empty for the file.

use std::collections::HashMap;

use tracing::debug;

use crate::render::render_markdown;
use crate::render::truncate;
use crate::types::MemoEntry;
use crate::types::Span;

const LABEL_PREVIEW_CHARS: usize = 40;
const LENS_TITLE_CHARS: usize = 10;

/// Opaque host-issued handle for one applied decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Decoration surface of the host editor. Attaching targets a specific
/// open document; detaching releases the host-side object.
pub trait OverlayHost {
    /// After-line label anchored at `(line, 0)`, with a Markdown hover
    /// body.
    fn attach_label(
        &mut self,
        file_path: &str,
        line: u32,
        text: &str,
        hover_markdown: &str,
    ) -> OverlayId;
    /// Background highlight spanning the recorded range.
    fn attach_highlight(&mut self, file_path: &str, span: Span) -> OverlayId;
    fn detach(&mut self, file_path: &str, overlay: OverlayId);
}

/// Told that lens inputs changed so the host re-queries [`Reflector::lenses`].
pub trait LensNotifier {
    fn lenses_changed(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LensAction {
    Update,
    Remove,
}

/// Actionable affordance anchored at a record's range, carrying the
/// arguments its invocation needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoLens {
    pub span: Span,
    pub action: LensAction,
    pub title: String,
    pub file_path: String,
    pub record_id: String,
}

struct AppliedOverlays {
    record_id: String,
    label: OverlayId,
    highlight: OverlayId,
}

#[derive(Default)]
pub struct Reflector {
    applied: HashMap<String, Vec<AppliedOverlays>>,
    notifier: Option<Box<dyn LensNotifier>>,
}

impl Reflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn LensNotifier>) {
        self.notifier = Some(notifier);
    }

    /// Recomputes every overlay for `file_path` from the full record list.
    /// After the call the applied overlays are in 1:1 correspondence with
    /// the entries whose record annotates the file.
    pub fn refresh(&mut self, host: &mut dyn OverlayHost, file_path: &str, entries: &[MemoEntry]) {
        if let Some(old) = self.applied.remove(file_path) {
            for overlay in old {
                debug!("detaching overlays for memo {}", overlay.record_id);
                host.detach(file_path, overlay.label);
                host.detach(file_path, overlay.highlight);
            }
        }

        let mut bag = Vec::new();
        for entry in entries.iter().filter(|e| e.record.file_path == file_path) {
            let record = &entry.record;
            let preview = format!("📝 {}", truncate(&record.memo, LABEL_PREVIEW_CHARS));
            let hover = render_markdown(record);
            let label = host.attach_label(file_path, record.start_line, &preview, &hover);
            let highlight = host.attach_highlight(file_path, record.span());
            bag.push(AppliedOverlays {
                record_id: record.id.clone(),
                label,
                highlight,
            });
        }
        self.applied.insert(file_path.to_string(), bag);

        if let Some(notifier) = &self.notifier {
            notifier.lenses_changed();
        }
    }

    /// Number of records currently reflected for `file_path` (each carries
    /// one label and one highlight).
    pub fn overlay_count(&self, file_path: &str) -> usize {
        self.applied.get(file_path).map_or(0, Vec::len)
    }

    /// Affordances for `file_path`, recomputed from scratch on every call:
    /// per matching record one update and one remove action, both carrying
    /// `(file_path, record_id)`.
    pub fn lenses(&self, file_path: &str, entries: &[MemoEntry]) -> Vec<MemoLens> {
        let mut lenses = Vec::new();
        for entry in entries.iter().filter(|e| e.record.file_path == file_path) {
            let record = &entry.record;
            let short = truncate(&record.memo, LENS_TITLE_CHARS);
            for (action, title) in [
                (LensAction::Update, format!("Update \"{short}\"")),
                (LensAction::Remove, format!("Remove \"{short}\"")),
            ] {
                lenses.push(MemoLens {
                    span: record.span(),
                    action,
                    title,
                    file_path: file_path.to_string(),
                    record_id: record.id.clone(),
                });
            }
        }
        lenses
    }
}
