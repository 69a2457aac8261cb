/// FolderTally CLI: subcommands and the interactive menu.
///
/// This crate contains all terminal code. Business logic lives in `foldertally-core`.
pub mod app;
pub mod args;
pub mod menu;
pub mod settings;
pub mod state;
pub mod theme;

pub use app::run;
pub use args::Cli;
