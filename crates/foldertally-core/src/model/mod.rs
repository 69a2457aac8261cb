/// Data model for the folder inventory.
///
/// Re-exports the session and inventory types and the display formatters.
pub mod format;
pub mod inventory;
pub mod session;

pub use inventory::{Analysis, InventoryEntry};
pub use session::Session;
