/// FolderTally Core: folder inventory log, scanning, analysis and sorting.
///
/// This crate contains all business logic with no frontend dependencies.
/// Frontends inject a [`transcript::Transcript`] to receive output.
///
/// # Modules
///
/// - [`logfile`]: The append-only log format and session appends.
/// - [`scanner`]: Subdirectory listing, single and batch.
/// - [`analysis`]: Log parsing, inventory tally and JSON/CSV reports.
/// - [`model`]: Session and inventory types plus display formatting.
/// - [`sorter`]: Per-extension file sorting with an undo journal.
/// - [`transcript`]: Output sinks handed to action handlers.
/// - [`actions`]: The transcript-writing handlers frontends call.
pub mod actions;
pub mod analysis;
pub mod error;
pub mod logfile;
pub mod model;
pub mod scanner;
pub mod sorter;
pub mod transcript;

pub use error::{Error, Result};
