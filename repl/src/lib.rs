//! HQL REPL library - query heap snapshots from the command line.
//!
//! - `repl`: REPL state, script and interactive execution
//! - `commands`: meta-commands such as `\classes`
//! - `format`: table rendering and help text

mod commands;
mod format;
mod repl;

pub use commands::Command;
pub use format::{format_results, help_text, print_help};
pub use repl::{Outcome, Repl};
