//! Query result types.

/// A single row of query results: rendered cells under their column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRow {
    /// Column names.
    names: Vec<String>,
    /// Rendered cells in column order.
    cells: Vec<String>,
}

impl QueryRow {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell to the row.
    pub fn push(&mut self, name: impl Into<String>, cell: impl Into<String>) {
        self.names.push(name.into());
        self.cells.push(cell.into());
    }

    /// Get a cell by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Get a cell by column name.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// (column name, cell) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(String::as_str))
    }
}

/// Query results collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults {
    /// Column names, known even when there are no rows.
    column_names: Vec<String>,
    rows: Vec<QueryRow>,
}

impl QueryResults {
    /// Create a new empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result set with column names.
    pub fn with_columns(names: Vec<String>) -> Self {
        Self {
            column_names: names,
            rows: Vec::new(),
        }
    }

    /// Add a row to the results.
    pub fn push(&mut self, row: QueryRow) {
        if self.column_names.is_empty() && !row.names().is_empty() {
            self.column_names = row.names().to_vec();
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &[QueryRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryRow> {
        self.rows.iter()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get_by_name(name))
            .collect()
    }

    pub fn into_rows(self) -> Vec<QueryRow> {
        self.rows
    }
}

impl IntoIterator for QueryResults {
    type Item = QueryRow;
    type IntoIter = std::vec::IntoIter<QueryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a QueryRow;
    type IntoIter = std::slice::Iter<'a, QueryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
