use std::sync::Arc;
use tracing::{debug, instrument};

use super::{avatar::AvatarManifest, types::PlayerResponse};
use crate::stats::{PlayerId, StatsError};
use crate::store::StoreHandle;

/// Player directory lookups joined with avatar information
pub struct PlayerService {
    store: StoreHandle,
    avatars: Arc<AvatarManifest>,
}

impl PlayerService {
    pub fn new(store: StoreHandle, avatars: Arc<AvatarManifest>) -> Self {
        Self { store, avatars }
    }

    /// Every player, sorted by name
    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<Vec<PlayerResponse>, StatsError> {
        let store = self.store.store()?;
        let players = store.players().await?;

        let mut responses = Vec::with_capacity(players.len());
        for player in players {
            let avatar_url = self.avatars.avatar_url(player.player_id).await;
            responses.push(PlayerResponse {
                player_id: player.player_id,
                username: player.username,
                avatar_url,
            });
        }

        debug!(players = responses.len(), "Players listed");
        Ok(responses)
    }

    /// `Ok(None)` when the snapshot has no player with this id
    #[instrument(skip(self))]
    pub async fn get_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<PlayerResponse>, StatsError> {
        let store = self.store.store()?;
        let Some(username) = store.player_name(player_id).await? else {
            debug!(player_id = %player_id, "Player not found");
            return Ok(None);
        };

        Ok(Some(PlayerResponse {
            player_id,
            username,
            avatar_url: self.avatars.avatar_url(player_id).await,
        }))
    }
}
