use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use memo_core::config::Settings;
use memo_core::extract::FileContext;
use memo_core::persist::MemoFiles;
use memo_core::reflect::OverlayHost;
use memo_core::reflect::OverlayId;
use memo_core::remote::NoRemoteLookup;
use memo_core::types::MemoRecord;
use memo_core::types::Span;
use memo_session::EditorSurface;
use memo_session::Prompter;
use memo_session::Session;
use pretty_assertions::assert_eq;

const NEW_SET: &str = "[Create new memo set]";

#[derive(Clone, Default)]
struct ScriptedPrompter {
    answers: Rc<RefCell<VecDeque<Option<String>>>>,
    messages: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    fn push(&self, answer: Option<&str>) {
        self.answers
            .borrow_mut()
            .push_back(answer.map(str::to_string));
    }

    fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, _prompt: &str) -> Option<String> {
        self.answers.borrow_mut().pop_front().flatten()
    }

    fn pick(&self, _placeholder: &str, options: &[String]) -> Option<String> {
        let answer = self.answers.borrow_mut().pop_front().flatten();
        if let Some(answer) = &answer {
            assert!(
                options.contains(answer),
                "scripted pick {answer:?} was not offered in {options:?}"
            );
        }
        answer
    }

    fn info(&self, message: &str) {
        self.messages.borrow_mut().push(format!("info: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }

    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(format!("error: {message}"));
    }
}

#[derive(Default)]
struct OverlayState {
    next_id: u64,
    live: HashMap<String, HashSet<u64>>,
    labels: HashMap<String, Vec<String>>,
}

#[derive(Clone, Default)]
struct FakeOverlays(Rc<RefCell<OverlayState>>);

impl FakeOverlays {
    fn live_count(&self, file_path: &str) -> usize {
        self.0.borrow().live.get(file_path).map_or(0, HashSet::len)
    }

    fn labels(&self, file_path: &str) -> Vec<String> {
        self.0
            .borrow()
            .labels
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    fn attach(&self, file_path: &str) -> OverlayId {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state
            .live
            .entry(file_path.to_string())
            .or_default()
            .insert(id);
        OverlayId(id)
    }
}

impl OverlayHost for FakeOverlays {
    fn attach_label(
        &mut self,
        file_path: &str,
        _line: u32,
        text: &str,
        _hover_markdown: &str,
    ) -> OverlayId {
        let id = self.attach(file_path);
        self.0
            .borrow_mut()
            .labels
            .entry(file_path.to_string())
            .or_default()
            .push(text.to_string());
        id
    }

    fn attach_highlight(&mut self, file_path: &str, _span: Span) -> OverlayId {
        self.attach(file_path)
    }

    fn detach(&mut self, file_path: &str, overlay: OverlayId) {
        let mut state = self.0.borrow_mut();
        let removed = state
            .live
            .get_mut(file_path)
            .is_some_and(|ids| ids.remove(&overlay.0));
        assert!(removed, "detached an overlay that was not live: {overlay:?}");
        state.labels.remove(file_path);
    }
}

struct FakeEditor {
    path: String,
    lines: Vec<String>,
    span: Span,
}

impl FileContext for FakeEditor {
    fn relative_path(&self) -> String {
        self.path.clone()
    }

    fn line(&self, line: u32) -> Option<String> {
        self.lines.get(line as usize).cloned()
    }
}

impl EditorSurface for FakeEditor {
    fn selection(&self) -> Span {
        self.span
    }
}

fn app_ts_editor() -> FakeEditor {
    let mut lines: Vec<String> = (0..9).map(|i| format!("// line {i}")).collect();
    lines.push("if (x == null) {".to_string());
    lines.push("  return;".to_string());
    lines.push("}".to_string());
    FakeEditor {
        path: "src/app.ts".to_string(),
        lines,
        span: Span {
            start_line: 9,
            start_character: 0,
            end_line: 11,
            end_character: 5,
        },
    }
}

fn session_at(root: &Path, prompter: &ScriptedPrompter, overlays: &FakeOverlays) -> Session {
    Session::new(
        root,
        Settings::default(),
        Box::new(NoRemoteLookup),
        Box::new(prompter.clone()),
        Box::new(overlays.clone()),
    )
    .unwrap()
}

fn read_records(path: &Path) -> Vec<MemoRecord> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn add_update_remove_full_walk() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);
    let editor = app_ts_editor();
    let json_path = dir.path().join("Review.code_memo.json");
    let md_path = dir.path().join("Review.code_memo.md");

    // Add "check null guard" on src/app.ts lines 10-12 (zero-based 9-11)
    // into a fresh set titled "Review".
    prompter.push(Some(NEW_SET));
    prompter.push(Some("Review"));
    prompter.push(Some("check null guard"));
    session.add_memo(&editor).unwrap();

    let records = read_records(&json_path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].memo, "check null guard");
    assert_eq!(records[0].file_path, "src/app.ts");
    assert_eq!(records[0].start_line, 9);
    assert_eq!(
        records[0].selected_text,
        "if (x == null) {\n  return;\n}"
    );
    let id = records[0].id.clone();
    assert!(!id.is_empty());

    let doc = fs::read_to_string(&md_path).unwrap();
    assert!(doc.starts_with("# Review\n"));
    assert!(doc.contains("check null guard  \n[[file](src/app.ts#L10)]"));
    assert!(doc.contains("```ts\nif (x == null) {\n  return;\n}\n```"));

    // The add already reflected the file: one label + one highlight.
    assert_eq!(overlays.live_count("src/app.ts"), 2);
    assert_eq!(session.lenses("src/app.ts").len(), 2);

    // Update the memo text to "fixed": same id, new text, one overlay.
    prompter.push(Some("fixed"));
    session.update_memo("src/app.ts", &id).unwrap();

    let records = read_records(&json_path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].memo, "fixed");
    assert_eq!(overlays.live_count("src/app.ts"), 2);
    assert_eq!(overlays.labels("src/app.ts"), ["📝 fixed"]);

    // Remove it: the set file stays behind as an empty array and the
    // file shows zero overlays.
    session.remove_memo("src/app.ts", &id).unwrap();
    assert_eq!(fs::read_to_string(&json_path).unwrap(), "[]");
    assert_eq!(overlays.live_count("src/app.ts"), 0);
    assert!(session.lenses("src/app.ts").is_empty());
    assert!(session.store().is_empty());
}

#[test]
fn second_memo_appends_to_the_existing_set() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);
    let editor = app_ts_editor();

    prompter.push(Some(NEW_SET));
    prompter.push(Some("Review"));
    prompter.push(Some("first"));
    session.add_memo(&editor).unwrap();

    // The picker now offers "Review" straight from disk discovery.
    prompter.push(Some("Review"));
    prompter.push(Some("second"));
    session.add_memo(&editor).unwrap();

    let records = read_records(&dir.path().join("Review.code_memo.json"));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].memo, "first");
    assert_eq!(records[1].memo, "second");
    // Two records on the same file: two labels + two highlights.
    assert_eq!(overlays.live_count("src/app.ts"), 4);
    assert_eq!(session.lenses("src/app.ts").len(), 4);
}

#[test]
fn dismissed_set_picker_aborts_without_state_change() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);
    let editor = app_ts_editor();

    prompter.push(None);
    session.add_memo(&editor).unwrap();

    assert!(session.store().is_empty());
    assert!(!dir.path().join("Review.code_memo.json").exists());
    assert!(
        prompter
            .messages()
            .iter()
            .any(|m| m == "info: No memo set selected")
    );
}

#[test]
fn dismissed_memo_input_aborts_without_state_change() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);
    let editor = app_ts_editor();

    prompter.push(Some(NEW_SET));
    prompter.push(Some("Review"));
    prompter.push(None);
    session.add_memo(&editor).unwrap();

    assert!(session.store().is_empty());
    assert!(!dir.path().join("Review.code_memo.json").exists());
    assert_eq!(overlays.live_count("src/app.ts"), 0);
}

#[test]
fn stale_lens_arguments_report_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);

    session.update_memo("src/app.ts", "ghost").unwrap();
    session.remove_memo("src/app.ts", "ghost").unwrap();

    let errors: Vec<String> = prompter
        .messages()
        .into_iter()
        .filter(|m| m == "error: Memo not found")
        .collect();
    assert_eq!(errors.len(), 2);
}

#[test]
fn new_memo_set_initializes_empty_artifacts_once() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);

    prompter.push(Some(NEW_SET));
    prompter.push(Some("Review"));
    session.new_memo_set().unwrap();

    let json_path = dir.path().join("Review.code_memo.json");
    assert_eq!(fs::read_to_string(&json_path).unwrap(), "[]");
    assert_eq!(
        fs::read_to_string(dir.path().join("Review.code_memo.md")).unwrap(),
        "# Review\n"
    );

    // Creating it again leaves the artifacts alone.
    prompter.push(Some(NEW_SET));
    prompter.push(Some("Review"));
    session.new_memo_set().unwrap();
    assert!(
        prompter
            .messages()
            .iter()
            .any(|m| m.contains("already exists"))
    );
}

#[test]
fn startup_seeds_from_disk_and_reflects_on_open() {
    let dir = tempfile::tempdir().unwrap();

    // First session writes two sets.
    {
        let prompter = ScriptedPrompter::default();
        let overlays = FakeOverlays::default();
        let mut session = session_at(dir.path(), &prompter, &overlays);
        let editor = app_ts_editor();

        prompter.push(Some(NEW_SET));
        prompter.push(Some("Review"));
        prompter.push(Some("check null guard"));
        session.add_memo(&editor).unwrap();

        prompter.push(Some(NEW_SET));
        prompter.push(Some("Perf"));
        prompter.push(Some("hot loop"));
        session.add_memo(&editor).unwrap();
    }

    // A fresh session replays both sets from disk and reflects them when
    // the file is opened, without any further prompting.
    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let mut session = session_at(dir.path(), &prompter, &overlays);

    assert_eq!(session.store().len(), 2);
    assert_eq!(session.store().get_by_set_title("Review").len(), 1);
    assert_eq!(session.store().get_by_set_title("Perf").len(), 1);

    session.on_file_open("src/app.ts");
    assert_eq!(overlays.live_count("src/app.ts"), 4);
    session.on_file_open("src/other.ts");
    assert_eq!(overlays.live_count("src/other.ts"), 0);
}

#[test]
fn malformed_set_file_is_skipped_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let files = MemoFiles::new(dir.path(), "code_memo");
    files
        .write_set(
            "good",
            &[MemoRecord {
                id: "1".to_string(),
                file_path: "a.rs".to_string(),
                remote_link: None,
                start_line: 0,
                start_character: 0,
                end_line: 0,
                end_character: 1,
                memo: "fine".to_string(),
                selected_text: "x".to_string(),
            }],
        )
        .unwrap();
    fs::write(dir.path().join("bad.code_memo.json"), "not json").unwrap();

    let prompter = ScriptedPrompter::default();
    let overlays = FakeOverlays::default();
    let session = session_at(dir.path(), &prompter, &overlays);

    assert_eq!(session.store().len(), 1);
    assert!(
        prompter
            .messages()
            .iter()
            .any(|m| m.starts_with("warn: Skipped malformed memo files:")
                && m.contains("bad.code_memo.json"))
    );
}
