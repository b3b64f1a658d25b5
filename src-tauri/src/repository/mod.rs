//! Repository Layer
//!
//! Data access abstractions and the SQLite implementation.

mod db;
mod list_repo;
mod traits;


pub use db::{init_db, DbState};
pub use list_repo::ListRepository;
pub use traits::ListDocuments;
