//! HQL Session
//!
//! Runs query text against one loaded heap.
//!
//! Responsibilities:
//! - Parse query text
//! - Cache class tables between queries
//! - Execute queries and collect rendered rows

mod error;
mod session;

pub use error::{SessionError, SessionResult};
pub use session::{run_query, Session};
