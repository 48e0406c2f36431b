//! Document state and logic (UI-agnostic).

mod eval;
mod history;
mod ops;
mod state;

pub use history::History;
pub use ops::Dimension;
pub use state::Document;
