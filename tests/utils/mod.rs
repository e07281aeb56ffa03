pub mod setup;
pub mod snapshot_builder;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
#[allow(unused_imports)]
pub use snapshot_builder::{SnapshotBuilder, SnapshotFixture};
