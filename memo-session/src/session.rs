use std::path::PathBuf;

use anyhow::Result;

use memo_core::config::Settings;
use memo_core::extract::build_record;
use memo_core::persist::MemoFiles;
use memo_core::reflect::LensNotifier;
use memo_core::reflect::MemoLens;
use memo_core::reflect::OverlayHost;
use memo_core::reflect::Reflector;
use memo_core::remote::RemoteLinkLookup;
use memo_core::store::MemoStore;

use crate::host::EditorSurface;
use crate::host::Prompter;

/// Picker entry offered alongside the existing set titles.
const NEW_SET_OPTION: &str = "[Create new memo set]";

/// One per project root, alive for the host session. Seeds its store from
/// the on-disk memo sets once at construction; afterwards disk is only
/// written, never re-read.
pub struct Session {
    files: MemoFiles,
    store: MemoStore,
    reflector: Reflector,
    remote: Box<dyn RemoteLinkLookup>,
    prompter: Box<dyn Prompter>,
    overlays: Box<dyn OverlayHost>,
}

impl Session {
    pub fn new(
        project_root: impl Into<PathBuf>,
        settings: Settings,
        remote: Box<dyn RemoteLinkLookup>,
        prompter: Box<dyn Prompter>,
        overlays: Box<dyn OverlayHost>,
    ) -> Result<Self> {
        let files = MemoFiles::new(project_root, settings.file_suffix);
        let loaded = files.load_all()?;
        if !loaded.skipped.is_empty() {
            let names: Vec<String> = loaded
                .skipped
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            prompter.warn(&format!(
                "Skipped malformed memo files: {}",
                names.join(", ")
            ));
        }
        let set_count = loaded.sets.len();
        let store = MemoStore::from_sets(loaded.sets);
        tracing::debug!("seeded {} memos from {set_count} memo sets", store.len());
        Ok(Self {
            files,
            store,
            reflector: Reflector::new(),
            remote,
            prompter,
            overlays,
        })
    }

    /// Routes lens-change notifications back to the host so it re-queries
    /// [`Session::lenses`].
    pub fn set_lens_notifier(&mut self, notifier: Box<dyn LensNotifier>) {
        self.reflector.set_notifier(notifier);
    }

    /// Creates a memo set's artifacts up front, without adding a record.
    pub fn new_memo_set(&mut self) -> Result<()> {
        let Some(title) = self.choose_set()? else {
            return Ok(());
        };
        if self.files.set_titles()?.contains(&title) {
            self.prompter
                .info(&format!("Memo set \"{title}\" already exists"));
            return Ok(());
        }
        let written = self.files.write_set(&title, &[])?;
        self.prompter.info(&format!(
            "Initialized memo set {}",
            written.narrative.display()
        ));
        Ok(())
    }

    /// Adds a memo on the editor's current selection to a chosen set.
    pub fn add_memo(&mut self, editor: &dyn EditorSurface) -> Result<()> {
        let Some(set_title) = self.choose_set()? else {
            return Ok(());
        };
        let Some(memo_text) = self.prompter.input("Input memo") else {
            self.prompter.info("No memo entered");
            return Ok(());
        };

        // No suspension from here on: extract, index, flush, reflect.
        let record = build_record(&memo_text, editor, editor.selection(), self.remote.as_ref());
        let file_path = record.file_path.clone();
        self.store.add(&set_title, record);
        let written = self
            .files
            .write_set(&set_title, &self.store.get_by_set_title(&set_title))?;
        self.refresh_file(&file_path);
        self.prompter.info(&format!(
            "Added memo! ({})",
            written.narrative.display()
        ));
        Ok(())
    }

    /// Lens action: replace a memo's text, keeping identity, anchor,
    /// snapshot and set membership.
    pub fn update_memo(&mut self, file_path: &str, id: &str) -> Result<()> {
        let Some(entry) = self.store.get_by_file_path_and_id(file_path, id) else {
            self.prompter.error("Memo not found");
            return Ok(());
        };
        let Some(memo_text) = self.prompter.input("Update memo") else {
            self.prompter.info("No memo entered");
            return Ok(());
        };

        let mut updated = entry.record;
        updated.memo = memo_text;
        let Some(current) = self.store.update(id, updated) else {
            self.prompter.error("Memo not found");
            return Ok(());
        };
        self.files.write_set(
            &current.set_title,
            &self.store.get_by_set_title(&current.set_title),
        )?;
        self.refresh_file(file_path);
        self.prompter.info("Updated memo!");
        Ok(())
    }

    /// Lens action: remove a memo and rewrite its set, which may become
    /// empty.
    pub fn remove_memo(&mut self, file_path: &str, id: &str) -> Result<()> {
        let Some(removed) = self.store.delete(id, file_path) else {
            self.prompter.error("Memo not found");
            return Ok(());
        };
        self.files.write_set(
            &removed.set_title,
            &self.store.get_by_set_title(&removed.set_title),
        )?;
        self.refresh_file(file_path);
        self.prompter.info("Removed memo!");
        Ok(())
    }

    /// Host notification: a document was opened or focused.
    pub fn on_file_open(&mut self, file_path: &str) {
        self.refresh_file(file_path);
    }

    /// Current affordances for `file_path`, recomputed from store state.
    pub fn lenses(&self, file_path: &str) -> Vec<MemoLens> {
        self.reflector.lenses(file_path, &self.store.get_all())
    }

    /// Read access for hosts that render their own views of the index.
    pub fn store(&self) -> &MemoStore {
        &self.store
    }

    /// Picks an existing memo set or prompts for a new title. `Ok(None)`
    /// means a prompt was dismissed and the command should abort.
    fn choose_set(&self) -> Result<Option<String>> {
        let mut options = vec![NEW_SET_OPTION.to_string()];
        options.extend(self.files.set_titles()?);
        let Some(choice) = self
            .prompter
            .pick("Create new memo set or select an existing one", &options)
        else {
            self.prompter.info("No memo set selected");
            return Ok(None);
        };
        if choice != NEW_SET_OPTION {
            return Ok(Some(choice));
        }
        let Some(title) = self.prompter.input("Input memo set title") else {
            self.prompter.info("No title entered");
            return Ok(None);
        };
        if title.trim().is_empty() {
            self.prompter.info("No title entered");
            return Ok(None);
        }
        Ok(Some(title))
    }

    fn refresh_file(&mut self, file_path: &str) {
        let entries = self.store.get_all();
        self.reflector
            .refresh(self.overlays.as_mut(), file_path, &entries);
    }
}
