pub mod coaching;
pub mod performance;
pub mod report;

pub use report::{Journal, JournalReport};
