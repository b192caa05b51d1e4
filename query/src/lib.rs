//! HQL Query
//!
//! Execute a parsed query against the instances of one class.
//!
//! Responsibilities:
//! - Resolve the target class into a table of instances
//! - Run the pipeline: filter, sort, offset, limit, project
//! - Render cell values to text

mod error;
mod executor;
mod operators;
mod render;
mod result;
mod table;

pub use error::{QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use render::render_value;
pub use result::{QueryResults, QueryRow};
pub use table::Table;
