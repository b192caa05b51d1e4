//! Splitting batch input into queries.

/// Split a script into query texts.
///
/// Queries end at a `;` or a blank line. `--` comments are dropped, and
/// separators inside quotes do not count.
pub fn split_queries(input: &str) -> Vec<String> {
    let mut queries = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for line in input.lines() {
        if quote.is_none() && line.trim().is_empty() {
            flush(&mut current, &mut queries);
            continue;
        }

        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match quote {
                Some(q) => {
                    current.push(c);
                    if c == '\\' && q != '`' {
                        if let Some(escaped) = chars.next() {
                            current.push(escaped);
                        }
                    } else if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    '\'' | '"' | '`' => {
                        quote = Some(c);
                        current.push(c);
                    }
                    '-' if chars.peek() == Some(&'-') => break,
                    ';' => flush(&mut current, &mut queries),
                    _ => current.push(c),
                },
            }
        }
        current.push('\n');
    }

    flush(&mut current, &mut queries);
    queries
}

fn flush(current: &mut String, queries: &mut Vec<String>) {
    let query = current.trim();
    if !query.is_empty() {
        queries.push(query.to_string());
    }
    current.clear();
}
