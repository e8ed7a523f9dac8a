//! Storage backends for sheets.

mod csv;

pub use csv::{load_csv, save_csv};
