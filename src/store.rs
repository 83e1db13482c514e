//! Shared league state for the web server: one lock around all players and matches, plus an
//! optional JSON snapshot file.

use crate::models::{League, LeagueError, MatchStatus, SNAPSHOT_VERSION};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// League behind a single `RwLock`. A mutation runs on a copy of the league, the copy is written
/// to the snapshot file, and only then does it replace the shared league. A failed check or a
/// failed snapshot write leaves the shared league untouched.
pub struct LeagueStore {
    league: RwLock<League>,
    data_file: Option<PathBuf>,
    /// Held for the whole of a mutation, snapshot write included, so writers never interleave.
    writer: tokio::sync::Mutex<()>,
}

impl LeagueStore {
    /// Empty league, nothing written to disk.
    pub fn in_memory() -> Self {
        Self {
            league: RwLock::new(League::new()),
            data_file: None,
            writer: tokio::sync::Mutex::new(()),
        }
    }

    /// League backed by `path`: loaded if the file exists, otherwise started empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeagueError> {
        let path = path.into();
        let league = if path.exists() {
            let league = load(&path)?;
            log::info!(
                "Loaded {} player(s) and {} match(es) from {}",
                league.players.len(),
                league.matches.len(),
                path.display()
            );
            league
        } else {
            log::info!("No snapshot at {}, starting empty", path.display());
            League::new()
        };
        Ok(Self {
            league: RwLock::new(league),
            data_file: Some(path),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    pub fn read<T>(
        &self,
        f: impl FnOnce(&League) -> Result<T, LeagueError>,
    ) -> Result<T, LeagueError> {
        let guard = self
            .league
            .read()
            .map_err(|_| LeagueError::Storage("lock error".into()))?;
        f(&*guard)
    }

    /// Apply `f` and persist the result. Readers see either the old league or the new one.
    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut League) -> Result<T, LeagueError>,
    ) -> Result<T, LeagueError> {
        let _writer = self.writer.lock().await;
        let mut next = self.read(|league| Ok(league.clone()))?;
        let out = f(&mut next)?;
        self.save(&next).await?;
        let mut guard = self
            .league
            .write()
            .map_err(|_| LeagueError::Storage("lock error".into()))?;
        *guard = next;
        Ok(out)
    }

    /// Write `league` to the data file (temp file + rename). No-op when in memory.
    async fn save(&self, league: &League) -> Result<(), LeagueError> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(league)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        log::debug!("Saved snapshot to {}", path.display());
        Ok(())
    }
}

fn load(path: &Path) -> Result<League, LeagueError> {
    let bytes = std::fs::read(path)?;
    let mut league: League = serde_json::from_slice(&bytes)?;
    if league.version > SNAPSHOT_VERSION {
        return Err(LeagueError::Storage(format!(
            "snapshot version {} is newer than supported version {}",
            league.version, SNAPSHOT_VERSION
        )));
    }
    if league.version < SNAPSHOT_VERSION {
        log::warn!(
            "Upgrading snapshot from version {} to {}",
            league.version,
            SNAPSHOT_VERSION
        );
        league.version = SNAPSHOT_VERSION;
    }
    check_matches(&league)
        .map_err(|e| LeagueError::Storage(format!("{}: {}", path.display(), e)))?;
    Ok(league)
}

/// Every match must hold up to the checks applied when it was recorded: two distinct known
/// players and, once completed, a score with a winner.
fn check_matches(league: &League) -> Result<(), LeagueError> {
    let known: HashSet<_> = league.players.iter().map(|p| p.id).collect();
    for m in &league.matches {
        if m.player_1 == m.player_2 {
            return Err(LeagueError::SamePlayer);
        }
        for id in [m.player_1, m.player_2] {
            if !known.contains(&id) {
                return Err(LeagueError::PlayerNotFound(id));
            }
        }
        if let MatchStatus::Completed(score) = m.status {
            if score.winner().is_none() {
                return Err(LeagueError::InvalidResult(format!(
                    "match {} has a tied score",
                    m.id
                )));
            }
        }
    }
    Ok(())
}
