// Crate root library declaration and module exports.
pub mod batch;
pub mod cli;
pub mod fixer;
pub mod nvt;
pub mod progress;
pub mod shell;
pub mod trace;
