//! Core REPL state and execution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hql_graph::Heap;
use hql_parser::split_queries;
use hql_session::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::commands::Command;
use crate::format::format_results;

const PROMPT: &str = "hql> ";
const CONTINUATION_PROMPT: &str = "  ... ";

/// What one input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print.
    Output(String),
    /// The user asked to leave.
    Quit,
}

/// REPL state.
pub struct Repl<'h> {
    session: Session<'h>,
    history: Option<PathBuf>,
}

impl<'h> Repl<'h> {
    /// Create a new REPL over a loaded heap.
    pub fn new(heap: &'h Heap) -> Self {
        Self {
            session: Session::new(heap),
            history: None,
        }
    }

    /// Keep interactive history in `path`.
    pub fn with_history(mut self, path: Option<PathBuf>) -> Self {
        self.history = path;
        self
    }

    /// Execute a meta-command or one query.
    pub fn execute(&mut self, input: &str) -> Result<Outcome, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Outcome::Output(String::new()));
        }

        match Command::parse(trimmed) {
            Some(Ok(Command::Quit)) => Ok(Outcome::Quit),
            Some(Ok(command)) => command.run(self.session.heap()).map(Outcome::Output),
            Some(Err(message)) => Err(message),
            None => self
                .session
                .run_query(trimmed)
                .map(|results| Outcome::Output(format_results(&results)))
                .map_err(|e| e.to_string()),
        }
    }

    /// Run a file of queries. Returns the number of failed queries.
    pub fn run_file(&mut self, path: &Path) -> anyhow::Result<usize> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(self.run_script(&content))
    }

    /// Run every query of a script, printing tables to stdout and errors to
    /// stderr. Returns the number of failed queries.
    pub fn run_script(&mut self, content: &str) -> usize {
        let mut failures = 0;
        for (text, result) in self.session.run_script(content) {
            match result {
                Ok(results) => println!("{}\n", format_results(&results)),
                Err(e) => {
                    failures += 1;
                    eprintln!("Error in `{}`: {}", first_line(&text), e);
                }
            }
        }
        failures
    }

    /// Run each query in order, stopping at the first failure.
    pub fn run_queries(&mut self, queries: &[String]) -> Result<(), String> {
        for query in queries {
            for text in split_queries(query) {
                match self.execute(&text)? {
                    Outcome::Output(out) => println!("{}\n", out),
                    Outcome::Quit => return Ok(()),
                }
            }
        }
        Ok(())
    }

    /// Interactive loop with line editing and history.
    pub fn interactive(&mut self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &self.history {
            // A missing history file is normal on first start.
            let _ = editor.load_history(path);
        }

        println!("HQL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type 'help' for commands, 'quit' to exit");
        println!();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    // Meta-commands only at the start of an input
                    if buffer.is_empty() {
                        if trimmed.is_empty() {
                            continue;
                        }
                        if Command::parse(trimmed).is_some() {
                            let _ = editor.add_history_entry(trimmed);
                            if self.print_outcome(trimmed) {
                                break;
                            }
                            continue;
                        }
                    }

                    if !trimmed.is_empty() {
                        if !buffer.is_empty() {
                            buffer.push('\n');
                        }
                        buffer.push_str(&line);
                    }

                    // A query ends with `;` or an empty line.
                    if trimmed.is_empty() || trimmed.ends_with(';') {
                        let query = std::mem::take(&mut buffer);
                        let _ = editor.add_history_entry(query.as_str());
                        self.print_outcome(&query);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C drops the pending query
                    buffer.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(path) = &self.history {
            if let Err(e) = editor.save_history(path) {
                warn!(path = %path.display(), error = %e, "Failed to save history");
            }
        }
        Ok(())
    }

    /// Execute and print. Returns true when the REPL should exit.
    fn print_outcome(&mut self, input: &str) -> bool {
        match self.execute(input) {
            Ok(Outcome::Output(out)) => {
                if !out.is_empty() {
                    println!("{}\n", out);
                }
                false
            }
            Ok(Outcome::Quit) => true,
            Err(e) => {
                eprintln!("Error: {}", e);
                false
            }
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
