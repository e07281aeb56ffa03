// Public API - what other modules can use
pub use avatar::{parse_manifest, AvatarManifest};
pub use handlers::{get_player, list_players};
pub use service::PlayerService;
pub use types::{PlayerProfileResponse, PlayerResponse, StatLineResponse};

// Internal modules
pub mod avatar;
mod handlers;
mod service;
mod types;
