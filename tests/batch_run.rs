// End-to-end behavior of the batch run loop over real directories.
use nvtfix::batch;
use nvtfix::shell::CommandRunner;
use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(tag: &str) -> PathBuf {
    // 1. Setup Isolation: unique directory per test invocation.
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let dir = env::temp_dir().join(format!(
        "nvtfix_test_{tag}_{}_{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Records command lines instead of spawning anything.
#[derive(Default)]
struct RecordingRunner {
    commands: RefCell<Vec<String>>,
    paused: Cell<bool>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, _working_dir: &Path, command_line: &str) {
        self.commands.borrow_mut().push(command_line.to_string());
    }

    fn pause(&self, _working_dir: &Path) {
        self.paused.set(true);
    }
}

/// Simulates the converter: creates the output file named in the command.
#[derive(Default)]
struct ConvertingRunner {
    inner: RecordingRunner,
}

impl CommandRunner for ConvertingRunner {
    fn run(&self, working_dir: &Path, command_line: &str) {
        self.inner.run(working_dir, command_line);
        let output_name = command_line.split(' ').nth(2).unwrap();
        fs::write(working_dir.join(output_name), b"fixed").unwrap();
    }

    fn pause(&self, working_dir: &Path) {
        self.inner.pause(working_dir);
    }
}

/// Creates a fixed set of files on every invocation, regardless of which
/// command ran. Used to show that outputs appearing mid-run cause skips.
struct EagerRunner {
    inner: RecordingRunner,
    creates: Vec<String>,
}

impl CommandRunner for EagerRunner {
    fn run(&self, working_dir: &Path, command_line: &str) {
        self.inner.run(working_dir, command_line);
        for name in &self.creates {
            fs::write(working_dir.join(name), b"fixed").unwrap();
        }
    }

    fn pause(&self, working_dir: &Path) {
        self.inner.pause(working_dir);
    }
}

fn run_with(dir: &Path, runner: &dyn CommandRunner) -> String {
    let mut out = Vec::new();
    batch::run(dir, &mut out, runner).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn single_candidate_issues_one_command() {
    let dir = temp_dir("single");
    fs::write(dir.join("a.nvt"), b"").unwrap();

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    assert_eq!(transcript, "nvtfix.exe a.nvt a_fixed.nvt a.csv\n\n\n");
    assert_eq!(
        *runner.commands.borrow(),
        vec!["nvtfix.exe a.nvt a_fixed.nvt a.csv".to_string()]
    );
    assert!(runner.paused.get());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn existing_output_skips_with_the_exact_notice() {
    let dir = temp_dir("skip");
    fs::write(dir.join("a.nvt"), b"").unwrap();
    fs::write(dir.join("a_fixed.nvt"), b"").unwrap();

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    // "a_fixed.nvt" itself is excluded from selection, so the transcript
    // holds exactly the skip notice and the trailing blank lines.
    assert_eq!(transcript, "a_fixed.nvt Output file exist. Skip.\n\n\n");
    assert!(runner.commands.borrow().is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn non_source_entries_are_ignored() {
    let dir = temp_dir("ignored");
    fs::write(dir.join("a.csv"), b"").unwrap();
    fs::write(dir.join("notes.txt"), b"").unwrap();
    fs::write(dir.join("b_fixed.nvt"), b"").unwrap();
    fs::write(dir.join("nvt"), b"").unwrap();

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    assert_eq!(transcript, "\n\n");
    assert!(runner.commands.borrow().is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_directory_only_pauses() {
    let dir = temp_dir("empty");

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    assert_eq!(transcript, "\n\n");
    assert!(runner.commands.borrow().is_empty());
    assert!(runner.paused.get());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn degenerate_bare_suffix_file_is_converted() {
    let dir = temp_dir("degenerate");
    fs::write(dir.join(".nvt"), b"").unwrap();

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    assert_eq!(transcript, "nvtfix.exe .nvt _fixed.nvt .csv\n\n\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn second_run_skips_everything_the_first_converted() {
    let dir = temp_dir("idempotent");
    fs::write(dir.join("a.nvt"), b"").unwrap();
    fs::write(dir.join("b.nvt"), b"").unwrap();

    // 1. First run converts both files.
    let converting = ConvertingRunner::default();
    run_with(&dir, &converting);
    assert_eq!(converting.inner.commands.borrow().len(), 2);

    // 2. Second run finds both outputs and only skips.
    let recording = RecordingRunner::default();
    let transcript = run_with(&dir, &recording);
    assert!(recording.commands.borrow().is_empty());
    assert_eq!(
        transcript
            .matches(" Output file exist. Skip.\n")
            .count(),
        2
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn output_appearing_mid_run_causes_a_skip() {
    let dir = temp_dir("midrun");
    fs::write(dir.join("a.nvt"), b"").unwrap();
    fs::write(dir.join("b.nvt"), b"").unwrap();

    // The first invocation creates both outputs; whichever source is
    // visited second must then hit the skip branch, because the existence
    // test is live rather than taken from the listing snapshot.
    let runner = EagerRunner {
        inner: RecordingRunner::default(),
        creates: vec!["a_fixed.nvt".to_string(), "b_fixed.nvt".to_string()],
    };
    let transcript = run_with(&dir, &runner);

    assert_eq!(runner.inner.commands.borrow().len(), 1);
    assert_eq!(
        transcript
            .matches(" Output file exist. Skip.\n")
            .count(),
        1
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn entries_are_not_filtered_by_file_type() {
    let dir = temp_dir("dirent");
    // A directory named like a source file is a candidate like any other
    // listing entry; the converter is left to fail on it.
    fs::create_dir(dir.join("x.nvt")).unwrap();

    let runner = RecordingRunner::default();
    let transcript = run_with(&dir, &runner);

    assert_eq!(transcript, "nvtfix.exe x.nvt x_fixed.nvt x.csv\n\n\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn directory_named_like_an_output_does_not_count_as_existing() {
    let dir = temp_dir("dirout");
    fs::write(dir.join("a.nvt"), b"").unwrap();
    // The existence check is a file check; a directory does not satisfy it.
    fs::create_dir(dir.join("a_fixed.nvt")).unwrap();

    let runner = RecordingRunner::default();
    run_with(&dir, &runner);

    assert_eq!(runner.commands.borrow().len(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_directory_fails_the_run() {
    let dir = temp_dir("gone").join("does_not_exist");
    let runner = RecordingRunner::default();
    let mut out = Vec::new();
    assert!(batch::run(&dir, &mut out, &runner).is_err());
}
