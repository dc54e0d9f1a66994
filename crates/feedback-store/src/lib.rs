//! Feedback Pattern Store
//!
//! Keyed persistence of one current pattern set per participant.
//!
//! # Core Operations
//!
//! - **get**: Read the live record for a participant, if any
//! - **put**: Atomically replace the participant's record (last write wins)
//! - **remove**: Drop the record so the next request regenerates
//!
//! # Backends
//!
//! ```text
//! PatternStore ─┬─ MemoryPatternStore  (moka, process-local)
//!               └─ FilePatternStore    (one JSON document per participant)
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod store;

// Re-exports for convenience
pub use error::StoreError;
pub use file::FilePatternStore;
pub use memory::MemoryPatternStore;
pub use record::CachedPatternRecord;
pub use store::PatternStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
