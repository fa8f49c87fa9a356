use anyhow::{anyhow, Context};
use log::{error, info, warn};
use serde::Serialize;

use super::profiles::fetch_rank_snapshot;
use crate::config::settings::AppConfig;
use crate::database::{self, in_transaction, players, DbPool, Player};
use crate::domain::{PeakRankLookup, RiotGateway, RiotId};
use crate::errors::{LeagueError, LeagueResult};
use crate::scoring::{compute_score, PlayerRankProfile};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepFailure {
    pub player_id: i64,
    pub reason: String,
}

/// Outcome of a batch pass over players; one player failing never stops the pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    fn record(&mut self, player_id: i64, outcome: LeagueResult<()>) {
        self.total += 1;
        match outcome {
            Ok(()) => self.succeeded += 1,
            Err(e) => {
                error!("Player {} failed: {}", player_id, e);
                self.failures.push(SweepFailure {
                    player_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn summary(&self) -> String {
        format!("{}/{} players updated", self.succeeded, self.total)
    }
}

pub struct SweepService<'a> {
    pool: &'a DbPool,
    config: &'a AppConfig,
}

impl<'a> SweepService<'a> {
    pub fn new(pool: &'a DbPool, config: &'a AppConfig) -> Self {
        Self { pool, config }
    }

    /// Recomputes every stored score from stored inputs, without upstream calls
    pub fn recompute_all(&self) -> LeagueResult<SweepReport> {
        let ids = self.player_ids()?;
        info!("Recomputing scores for {} players", ids.len());

        let mut report = SweepReport::default();
        for player_id in ids {
            let outcome = in_transaction(self.pool, |tx| {
                let player = load(tx, player_id)?;
                let score = compute_score(&player.rank_profile());
                players::save_rank_profile(tx, player.id, &player.rank_profile(), score)?;
                Ok(())
            });
            report.record(player_id, outcome);
        }

        info!("Score recompute finished: {}", report.summary());
        Ok(report)
    }

    /// Re-fetches current rank, peaks and mastery signal for every linked player
    pub async fn refresh_ranks_all<R, P>(&self, riot: &R, peak_lookup: &P) -> LeagueResult<SweepReport>
    where
        R: RiotGateway,
        P: PeakRankLookup,
    {
        let linked = self.linked_players()?;
        info!("Refreshing ranks for {} linked players", linked.len());

        let mut report = SweepReport::default();
        for (idx, player) in linked.iter().enumerate() {
            info!("  [{}/{}] {}", idx + 1, linked.len(), player.account_id);
            let outcome = self.refresh_ranks(riot, peak_lookup, player).await;
            report.record(player.id, outcome);
        }

        info!("Rank refresh finished: {}", report.summary());
        Ok(report)
    }

    /// Re-fetches account level for every linked player
    pub async fn refresh_levels_all<R: RiotGateway>(&self, riot: &R) -> LeagueResult<SweepReport> {
        let linked = self.linked_players()?;
        info!("Refreshing account levels for {} linked players", linked.len());

        let mut report = SweepReport::default();
        for player in &linked {
            let outcome = self.refresh_level(riot, player).await;
            report.record(player.id, outcome);
        }

        info!("Level refresh finished: {}", report.summary());
        Ok(report)
    }

    async fn refresh_ranks<R, P>(&self, riot: &R, peak_lookup: &P, player: &Player) -> LeagueResult<()>
    where
        R: RiotGateway,
        P: PeakRankLookup,
    {
        let puuid = linked_puuid(player)?;
        let riot_id = player.summoner_handle.as_deref().and_then(RiotId::parse);
        let snapshot = fetch_rank_snapshot(riot, peak_lookup, &self.config.scoring, riot_id.as_ref(), puuid)
            .await
            .map_err(|e| LeagueError::upstream("Riot API", e))?;

        self.store(player.id, |profile| snapshot.apply_to(&profile))
    }

    async fn refresh_level<R: RiotGateway>(&self, riot: &R, player: &Player) -> LeagueResult<()> {
        let puuid = linked_puuid(player)?;
        let level = riot
            .account_level(puuid)
            .await
            .with_context(|| format!("Failed to fetch account level of {}", player.account_id))
            .map_err(|e| LeagueError::upstream("Riot API", e))?;

        let Some(level) = level else {
            warn!("No summoner profile for {}, keeping level {}", player.account_id, player.account_level);
            return Ok(());
        };
        self.store(player.id, |profile| PlayerRankProfile {
            account_level: level,
            ..profile
        })
    }

    /// Applies `update` to the freshly read profile and saves it with its score
    fn store<F>(&self, player_id: i64, update: F) -> LeagueResult<()>
    where
        F: FnOnce(PlayerRankProfile) -> PlayerRankProfile,
    {
        in_transaction(self.pool, |tx| {
            let player = load(tx, player_id)?;
            let profile = update(player.rank_profile());
            let score = compute_score(&profile);
            players::save_rank_profile(tx, player.id, &profile, score)?;
            if score != player.score {
                info!("  {} score {} -> {}", player.account_id, player.score, score);
            }
            Ok(())
        })
    }

    fn player_ids(&self) -> LeagueResult<Vec<i64>> {
        let conn = database::get_connection(self.pool)?;
        Ok(players::list_ids(&conn)?)
    }

    fn linked_players(&self) -> LeagueResult<Vec<Player>> {
        let conn = database::get_connection(self.pool)?;
        Ok(players::list_linked(&conn)?)
    }
}

fn linked_puuid(player: &Player) -> LeagueResult<&str> {
    player
        .puuid
        .as_deref()
        .ok_or_else(|| LeagueError::Internal(anyhow!("Player {} has no linked Riot account", player.id)))
}

fn load(conn: &rusqlite::Connection, player_id: i64) -> LeagueResult<Player> {
    players::find_by_id(conn, player_id)?
        .ok_or_else(|| LeagueError::NotFound(format!("Player {} no longer exists", player_id)))
}
