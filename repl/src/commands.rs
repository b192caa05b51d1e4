//! Meta-commands of the interactive prompt.

use hql_graph::Heap;

use crate::format::help_text;

/// A backslash command or one of the bare words `help`, `quit`, `exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Classes whose name contains the pattern
    Classes(Option<String>),
    /// Fields of one class
    Fields(String),
    Info,
}

impl Command {
    /// Recognize a meta-command. Returns `None` for query text.
    pub fn parse(input: &str) -> Option<Result<Command, String>> {
        let mut words = input.trim().trim_end_matches(';').split_whitespace();
        let name = words.next()?;
        let arg = words.next().map(str::to_string);

        let command = match name.to_lowercase().as_str() {
            "help" | "\\h" | "\\?" => Command::Help,
            "quit" | "exit" | "\\q" => Command::Quit,
            "\\classes" => Command::Classes(arg),
            "\\fields" => match arg {
                Some(class) => Command::Fields(class),
                None => return Some(Err("usage: \\fields CLASS".to_string())),
            },
            "\\info" => Command::Info,
            other if other.starts_with('\\') => {
                return Some(Err(format!("unknown command: {}, try \\h", name)))
            }
            _ => return None,
        };
        Some(Ok(command))
    }

    /// Run a command that produces output. `Quit` produces nothing.
    pub fn run(&self, heap: &Heap) -> Result<String, String> {
        match self {
            Command::Help => Ok(help_text()),
            Command::Quit => Ok(String::new()),
            Command::Classes(pattern) => Ok(list_classes(heap, pattern.as_deref())),
            Command::Fields(class) => describe_class(heap, class),
            Command::Info => Ok(describe_heap(heap)),
        }
    }
}

fn list_classes(heap: &Heap, pattern: Option<&str>) -> String {
    let mut classes: Vec<_> = heap
        .classes()
        .iter()
        .filter(|class| pattern.map_or(true, |p| class.name.contains(p)))
        .collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out: Vec<String> = classes
        .iter()
        .map(|class| format!("{} ({} instances)", class.name, class.instances.len()))
        .collect();
    out.push(format!("({} classes)", classes.len()));
    out.join("\n")
}

fn describe_class(heap: &Heap, name: &str) -> Result<String, String> {
    let class = heap.class_by_name(name).map_err(|e| e.to_string())?;

    let mut out = vec![format!("class {}", class.name)];
    if let Some(superclass) = class.superclass {
        out.push(format!("  extends {}", heap.class(superclass).name));
    }
    for (field, ty) in &class.fields {
        out.push(format!("  {} {}", ty, field));
    }
    for (field, value) in &class.static_fields {
        out.push(format!("  static {} = {}", field, value));
    }
    Ok(out.join("\n"))
}

fn describe_heap(heap: &Heap) -> String {
    let header = heap.header();
    [
        format!("format:          {}", header.format),
        format!("identifier size: {}", header.identifier_size),
        format!("timestamp:       {}", header.timestamp),
        format!("classes:         {}", heap.classes().len()),
        format!("instances:       {}", heap.instances().len()),
        format!("arrays:          {}", heap.arrays().len()),
    ]
    .join("\n")
}
