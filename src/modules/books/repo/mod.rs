//! Persistence adapters for the book repository contract.

mod memory;
mod sqlite;

pub use memory::InMemoryBookRepository;
pub use sqlite::SqliteBookRepository;
