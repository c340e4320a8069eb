// File: ./src/shell.rs
/*! OS command execution seam for the batch driver.

The driver hands fully formed command lines to a `CommandRunner` instead of
spawning processes itself, so tests can substitute a recording runner and
assert on exactly what would have been executed. The production
`ShellRunner` routes the line through the platform shell (`cmd /C` on
Windows, `sh -c` elsewhere), which matches the "one space-joined command
line" contract of the external converter.
*/

use std::path::Path;
use std::process::Command;

/// Runs OS-level command lines on behalf of the batch driver.
///
/// The trait is object-safe so callers can hold `&dyn CommandRunner`.
pub trait CommandRunner {
    /// Run one command line through the platform shell, blocking until the
    /// spawned process exits. The exit status is not inspected and spawn
    /// failures are swallowed; the driver proceeds to the next entry
    /// regardless of what happened here.
    fn run(&self, working_dir: &Path, command_line: &str);

    /// Block on the console "pause" prompt at the end of a run. On
    /// platforms without a `pause` builtin the shell reports an unknown
    /// command and the run simply ends.
    fn pause(&self, working_dir: &Path) {
        self.run(working_dir, "pause");
    }
}

// --- Production Implementation ---

#[derive(Debug, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, working_dir: &Path, command_line: &str) {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", command_line]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command_line]);
            c
        };
        match command.current_dir(working_dir).status() {
            Ok(status) => log::debug!("`{command_line}` exited with {status}"),
            Err(e) => log::debug!("`{command_line}` could not be spawned: {e}"),
        }
    }
}
