use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::stats::PlayerId;
use crate::store::ResourceLocation;

/// Lazily loaded `player_id → file extension` map for avatar images.
///
/// A missing or unreadable manifest is never an error: it is logged once and
/// every player is treated as having no avatar for the rest of the session.
#[derive(Debug)]
pub struct AvatarManifest {
    location: Option<ResourceLocation>,
    base_url: String,
    entries: OnceCell<HashMap<PlayerId, String>>,
}

impl AvatarManifest {
    pub fn new(location: ResourceLocation, base_url: impl Into<String>) -> Self {
        Self {
            location: Some(location),
            base_url: base_url.into(),
            entries: OnceCell::new(),
        }
    }

    /// A manifest with no source; every lookup is absent.
    pub fn disabled() -> Self {
        Self {
            location: None,
            base_url: String::new(),
            entries: OnceCell::new(),
        }
    }

    pub async fn entries(&self) -> &HashMap<PlayerId, String> {
        self.entries.get_or_init(|| self.fetch()).await
    }

    pub async fn avatar_url(&self, player_id: PlayerId) -> Option<String> {
        let extension = self.entries().await.get(&player_id)?;
        Some(format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            player_id,
            extension
        ))
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> HashMap<PlayerId, String> {
        let Some(location) = &self.location else {
            return HashMap::new();
        };

        let bytes = match location.fetch().await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(error = %error, "Avatar manifest not found, avatars will not load");
                return HashMap::new();
            }
        };

        match parse_manifest(&bytes) {
            Ok(entries) => {
                debug!(avatars = entries.len(), "Avatar manifest loaded");
                entries
            }
            Err(error) => {
                warn!(error = %error, "Failed to parse avatar manifest");
                HashMap::new()
            }
        }
    }
}

/// Parses `{ "<player_id>": ".ext" }`. Keys that are not player ids are skipped.
pub fn parse_manifest(bytes: &[u8]) -> Result<HashMap<PlayerId, String>, serde_json::Error> {
    let raw: HashMap<String, String> = serde_json::from_slice(bytes)?;

    Ok(raw
        .into_iter()
        .filter_map(|(key, extension)| match key.parse::<PlayerId>() {
            Ok(player_id) => Some((player_id, extension)),
            Err(_) => {
                warn!(key = %key, "Skipping avatar entry with invalid player id");
                None
            }
        })
        .collect())
}
