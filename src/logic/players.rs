//! Player registration and profile edits. Statistics are never written from here.

use crate::models::{League, LeagueError, Player, PlayerId};
use rand::seq::SliceRandom;
use serde::Deserialize;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/pixel-art/svg";
const AVATAR_COLORS: [&str; 5] = ["0ea5e9", "d946ef", "8b5cf6", "f97316", "4ade80"];

/// Body for registering a player.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// Body for editing a player. Only identity fields; statistics are rejected as unknown fields.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub disabled: Option<bool>,
}

/// Generated avatar for players who did not supply one, seeded by name.
pub fn default_avatar_url(name: &str) -> String {
    let color = AVATAR_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(AVATAR_COLORS[0]);
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("seed", name)
        .append_pair("backgroundColor", color)
        .finish();
    format!("{}?{}", AVATAR_BASE_URL, query)
}

fn clean_name(name: &str) -> Result<String, LeagueError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::InvalidPlayer("name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value, or `None` when empty or whitespace-only.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

/// Register a new player. Emails are unique (case-insensitive).
pub fn add_player(league: &mut League, new: NewPlayer) -> Result<PlayerId, LeagueError> {
    let name = clean_name(&new.name)?;
    let email = non_blank(new.email.as_deref());
    if let Some(e) = &email {
        if league.email_taken(e, None) {
            return Err(LeagueError::DuplicateEmail);
        }
    }
    let avatar_url = match non_blank(new.avatar_url.as_deref()) {
        Some(url) => url,
        None => default_avatar_url(&name),
    };
    let mut player = Player::new(name, avatar_url);
    player.email = email;
    let id = player.id;
    log::info!("Added player {} ({})", player.name, id);
    league.players.push(player);
    Ok(id)
}

/// Edit name, email, avatar or disabled flag.
pub fn update_player(
    league: &mut League,
    player_id: PlayerId,
    update: PlayerUpdate,
) -> Result<(), LeagueError> {
    league.player(player_id)?;
    let name = update.name.as_deref().map(clean_name).transpose()?;
    let email = update.email.as_deref().map(|e| non_blank(Some(e)));
    if let Some(Some(e)) = &email {
        if league.email_taken(e, Some(player_id)) {
            return Err(LeagueError::DuplicateEmail);
        }
    }

    let player = league.player_mut(player_id)?;
    if let Some(name) = name {
        player.name = name;
    }
    if let Some(email) = email {
        player.email = email;
    }
    if let Some(url) = non_blank(update.avatar_url.as_deref()) {
        player.avatar_url = url;
    }
    if let Some(disabled) = update.disabled {
        player.disabled = disabled;
    }
    player.touch();
    Ok(())
}

/// Remove a player who has never been entered into a match.
pub fn delete_player(league: &mut League, player_id: PlayerId) -> Result<Player, LeagueError> {
    let idx = league
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(LeagueError::PlayerNotFound(player_id))?;
    if league.matches.iter().any(|m| m.involves(player_id)) {
        return Err(LeagueError::PlayerHasMatches(player_id));
    }
    log::info!("Deleted player {}", player_id);
    Ok(league.players.remove(idx))
}
