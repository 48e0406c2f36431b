//! File formats: JSON snapshots and Markdown export.

pub mod md;
pub mod snapshot;

pub use md::{markdown_string, write_markdown};
pub use snapshot::{Snapshot, cell_key, load_file, parse_cell_key, save_file};
