// Public API - what other modules can use
pub use handle::{StoreHandle, StoreStatus};
pub use handlers::health;
pub use repository::{SnapshotStore, StoreOptions, REQUIRED_TABLES, SQLITE_HEADER};
pub use resource::ResourceLocation;

// Internal modules
mod handle;
mod handlers;
pub mod repository;
pub mod resource;
