use log::info;
use std::collections::HashMap;

use super::profiles::fetch_rank_snapshot;
use crate::config::settings::AppConfig;
use crate::database::{self, in_transaction, players, teams, DbPool, NewPlayer, Player, PlayerFilter, RiotLink, Team};
use crate::domain::{Lane, PeakRankLookup, RiotGateway, RiotId, SchoolCredentials, SchoolDirectory};
use crate::errors::{LeagueError, LeagueResult};
use crate::scoring::{compute_score, PlayerRankProfile, RankPoint, Tier};

/// Riot account details submitted by a player
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub game_name: String,
    pub tag_line: String,
    pub most_lane: Lane,
    pub second_lane: Lane,
}

/// A player together with the team they belong to
#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub player: Player,
    pub team: Option<Team>,
}

impl PlayerEntry {
    pub fn is_team_leader(&self) -> bool {
        self.team
            .as_ref()
            .is_some_and(|team| team.leader_id == self.player.id)
    }
}

pub struct AccountService<'a> {
    pool: &'a DbPool,
    config: &'a AppConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(pool: &'a DbPool, config: &'a AppConfig) -> Self {
        Self { pool, config }
    }

    /// Authenticates against the school SSO, creating the player on first login
    pub async fn login<S: SchoolDirectory>(
        &self,
        school: &S,
        credentials: &SchoolCredentials,
    ) -> LeagueResult<Player> {
        if credentials.account_id.trim().is_empty() || credentials.password.is_empty() {
            return Err(LeagueError::InvalidInput(
                "Account id and password are required".to_string(),
            ));
        }

        let user = school
            .authenticate(credentials)
            .await
            .map_err(|e| LeagueError::upstream("School SSO", e))?
            .ok_or_else(|| LeagueError::Forbidden("School account authentication failed".to_string()))?;

        in_transaction(self.pool, |tx| {
            if let Some(player) = players::find_by_account_id(tx, &user.account_id)? {
                return Ok(player);
            }
            let player = players::insert_player(
                tx,
                &NewPlayer {
                    account_id: &user.account_id,
                    name: &user.name,
                    grade: user.grade,
                    class_num: user.class_num,
                    num: user.num,
                    role: user.role,
                },
            )?;
            info!("Registered new player {} ({})", player.account_id, player.name);
            Ok(player)
        })
    }

    /// Links a Riot account and computes the first score from live data
    pub async fn link_riot_account<R, P>(
        &self,
        riot: &R,
        peak_lookup: &P,
        account_id: &str,
        request: &LinkRequest,
    ) -> LeagueResult<Player>
    where
        R: RiotGateway,
        P: PeakRankLookup,
    {
        let player = self.find_player(account_id)?;
        if player.is_linked() {
            return Err(LeagueError::Conflict("A Riot account is already linked".to_string()));
        }
        if request.most_lane == request.second_lane {
            return Err(LeagueError::InvalidInput(
                "Main and secondary lanes must differ".to_string(),
            ));
        }
        let riot_id = RiotId::new(&request.game_name, &request.tag_line);
        if riot_id.game_name.is_empty() || riot_id.tag_line.is_empty() {
            return Err(LeagueError::InvalidInput(
                "Riot ID needs both a game name and a tag line".to_string(),
            ));
        }

        let account = riot
            .resolve_account(&riot_id)
            .await
            .map_err(|e| LeagueError::upstream("Riot API", e))?
            .ok_or_else(|| LeagueError::NotFound(format!("Riot ID {} does not exist", riot_id.handle())))?;
        self.ensure_puuid_free(&account.puuid)?;

        let level = riot
            .account_level(&account.puuid)
            .await
            .map_err(|e| LeagueError::upstream("Riot API", e))?
            .ok_or_else(|| LeagueError::NotFound(format!("No summoner profile for {}", riot_id.handle())))?;
        if level < self.config.scoring.min_account_level {
            return Err(LeagueError::InvalidInput(format!(
                "Account level {} is below the required {}",
                level, self.config.scoring.min_account_level
            )));
        }

        let snapshot = fetch_rank_snapshot(riot, peak_lookup, &self.config.scoring, Some(&riot_id), &account.puuid)
            .await
            .map_err(|e| LeagueError::upstream("Riot API", e))?;

        let handle = riot_id.handle();
        in_transaction(self.pool, |tx| {
            let player = players::find_by_id(tx, player.id)?
                .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))?;
            if player.is_linked() {
                return Err(LeagueError::Conflict("A Riot account is already linked".to_string()));
            }
            if players::find_by_puuid(tx, &account.puuid)?.is_some() {
                return Err(LeagueError::Conflict("This Riot account is already registered".to_string()));
            }
            if players::find_by_summoner_handle(tx, &handle)?.is_some() {
                return Err(LeagueError::Conflict(format!("{} is already registered", handle)));
            }

            players::link_riot_account(
                tx,
                player.id,
                &RiotLink {
                    summoner_handle: &handle,
                    summoner_id: account.summoner_id.as_deref(),
                    puuid: &account.puuid,
                    most_lane: request.most_lane,
                    second_lane: request.second_lane,
                },
            )?;

            let profile = PlayerRankProfile {
                account_level: level,
                ..snapshot.apply_to(&player.rank_profile())
            };
            let score = compute_score(&profile);
            players::save_rank_profile(tx, player.id, &profile, score)?;
            info!("{} linked {} with score {}", player.account_id, handle, score);

            reload(tx, player.id)
        })
    }

    /// Overrides the stored all-time highest rank and recomputes the score
    pub fn update_all_time_highest(&self, account_id: &str, rank: RankPoint) -> LeagueResult<Player> {
        in_transaction(self.pool, |tx| {
            let player = players::find_by_account_id(tx, account_id)?
                .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))?;

            let profile = PlayerRankProfile {
                all_time_highest: Some(rank),
                ..player.rank_profile()
            };
            let score = compute_score(&profile);
            players::save_rank_profile(tx, player.id, &profile, score)?;
            info!("{} set all-time highest to {} (score {})", account_id, rank, score);

            reload(tx, player.id)
        })
    }

    pub fn profile(&self, account_id: &str) -> LeagueResult<PlayerEntry> {
        let conn = database::get_connection(self.pool)?;
        let player = players::find_by_account_id(&conn, account_id)?
            .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))?;
        let team = match player.team_id {
            Some(team_id) => teams::find_by_id(&conn, team_id)?,
            None => None,
        };
        Ok(PlayerEntry { player, team })
    }

    pub fn list_users(&self, filter: &PlayerFilter) -> LeagueResult<Vec<PlayerEntry>> {
        let conn = database::get_connection(self.pool)?;
        let found = players::list(&conn, filter)?;
        with_teams(&conn, found)
    }

    /// Players not on any team, for recruiting
    pub fn available_users(&self, tier: Option<Tier>, name: Option<String>) -> LeagueResult<Vec<PlayerEntry>> {
        self.list_users(&PlayerFilter {
            tier,
            name_contains: name,
            has_team: Some(false),
        })
    }

    fn find_player(&self, account_id: &str) -> LeagueResult<Player> {
        let conn = database::get_connection(self.pool)?;
        players::find_by_account_id(&conn, account_id)?
            .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))
    }

    fn ensure_puuid_free(&self, puuid: &str) -> LeagueResult<()> {
        let conn = database::get_connection(self.pool)?;
        match players::find_by_puuid(&conn, puuid)? {
            Some(_) => Err(LeagueError::Conflict("This Riot account is already registered".to_string())),
            None => Ok(()),
        }
    }
}

fn reload(conn: &rusqlite::Connection, player_id: i64) -> LeagueResult<Player> {
    players::find_by_id(conn, player_id)?
        .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))
}

/// Attaches each player's team, loading every team once
pub(crate) fn with_teams(conn: &rusqlite::Connection, found: Vec<Player>) -> LeagueResult<Vec<PlayerEntry>> {
    let mut cache: HashMap<i64, Option<Team>> = HashMap::new();
    let mut entries = Vec::with_capacity(found.len());

    for player in found {
        let team = match player.team_id {
            Some(team_id) => {
                if !cache.contains_key(&team_id) {
                    cache.insert(team_id, teams::find_by_id(conn, team_id)?);
                }
                cache.get(&team_id).cloned().flatten()
            }
            None => None,
        };
        entries.push(PlayerEntry { player, team });
    }

    Ok(entries)
}
