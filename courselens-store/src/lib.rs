//! Input loading and snapshot persistence.
//!
//! - [`input`]: title lists and `{title, url}` pair files
//! - [`snapshot`]: the [`snapshot::SnapshotStore`] seam with filesystem and
//!   in-memory implementations, so the batch loop never touches the disk
//!   directly and unit tests need no I/O
//! - [`combined`]: the merged multi-content-type dataset

pub mod combined;
pub mod input;
pub mod snapshot;

pub use combined::{build_combined, write_combined, CombinedDataset};
pub use input::{load_inputs, CourseInput};
pub use snapshot::{FsSnapshotStore, MemorySnapshotStore, SnapshotStore};
