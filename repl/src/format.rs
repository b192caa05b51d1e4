//! Output formatting utilities for the REPL.

use hql_query::QueryResults;

/// Render results as a text table followed by a row count.
///
/// Cells are left-aligned and padded to the widest cell of their column.
pub fn format_results(results: &QueryResults) -> String {
    let columns = results.column_names();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in results {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_line(columns, &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&separator.join("-+-"));
    out.push('\n');
    for row in results {
        out.push_str(&format_line(row.cells(), &widths));
    }
    out.push_str(&format!("({} rows)", results.len()));
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let mut line = padded.join(" | ").trim_end().to_string();
    line.push('\n');
    line
}

/// Help text for the interactive prompt.
pub fn help_text() -> String {
    [
        "HQL Commands:",
        "  \\classes [PATTERN]  List classes whose name contains PATTERN",
        "  \\fields CLASS       Show the fields of a class",
        "  \\info               Show snapshot information",
        "  help, \\h            Show this help",
        "  quit, exit, \\q      Exit",
        "",
        "Queries:",
        "  SELECT columns FROM Class [WHERE expr] [ORDER BY expr [ASC|DESC]]",
        "         [LIMIT n] [OFFSET n]",
        "",
        "  columns is * or a comma-separated list of expressions (expr AS name).",
        "  End a query with ; or an empty line.",
    ]
    .join("\n")
}

/// Print help information.
pub fn print_help() {
    println!("{}", help_text());
}
