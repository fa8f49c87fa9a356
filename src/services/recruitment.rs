use log::info;
use rusqlite::Connection;

use super::teams::{current_team, find_player};
use crate::config::settings::AppConfig;
use crate::database::{self, in_transaction, players, recruits, teams, DbPool, RecruitRequest};
use crate::errors::{LeagueError, LeagueResult};
use crate::league::{CapacityPolicy, RecruitDecision, RecruitStatus};

const MAX_MESSAGE_CHARS: usize = 200;

/// A recruit request with the names a reader needs
#[derive(Debug, Clone)]
pub struct RecruitEntry {
    pub request: RecruitRequest,
    pub team_name: String,
    pub target_name: String,
    pub requester_name: String,
}

/// Result of answering a request
#[derive(Debug, Clone)]
pub struct RecruitResolution {
    pub entry: RecruitEntry,
    /// Competing offers rejected because this one was accepted
    pub rejected_others: usize,
}

impl RecruitResolution {
    pub fn message(&self) -> String {
        match self.entry.request.status {
            RecruitStatus::Accepted => format!("You joined team {}", self.entry.team_name),
            _ => format!("You declined the offer from team {}", self.entry.team_name),
        }
    }
}

pub struct RecruitService<'a> {
    pool: &'a DbPool,
    policy: CapacityPolicy,
}

impl<'a> RecruitService<'a> {
    pub fn new(pool: &'a DbPool, config: &AppConfig) -> Self {
        Self {
            pool,
            policy: config.league.capacity_policy(),
        }
    }

    /// Opens a PENDING offer from the requester's team to the target
    pub fn send(
        &self,
        requester_account_id: &str,
        target_player_id: i64,
        message: Option<&str>,
    ) -> LeagueResult<RecruitEntry> {
        let message = message.map(str::trim).filter(|m| !m.is_empty());
        if message.is_some_and(|m| m.chars().count() > MAX_MESSAGE_CHARS) {
            return Err(LeagueError::InvalidInput(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        in_transaction(self.pool, |tx| {
            let requester = find_player(tx, requester_account_id)?;
            let team = current_team(tx, &requester)?;
            if team.leader_id != requester.id {
                return Err(LeagueError::Forbidden(
                    "Only the team leader can send recruit requests".to_string(),
                ));
            }

            let roster = players::roster(tx, team.id)?;
            self.policy.ensure_open_slot(&roster)?;

            let target = players::find_by_id(tx, target_player_id)?
                .ok_or_else(|| LeagueError::NotFound("Target user not found".to_string()))?;
            if target.team_id == Some(team.id) {
                return Err(LeagueError::Conflict(format!("{} is already on this team", target.name)));
            }
            if recruits::exists_pending(tx, team.id, target.id)? {
                return Err(LeagueError::Conflict(format!(
                    "A request to {} is already pending",
                    target.name
                )));
            }

            let request = recruits::insert_request(tx, team.id, target.id, requester.id, message)?;
            info!("Team {} invited {}", team.name, target.account_id);

            Ok(RecruitEntry {
                request,
                team_name: team.name,
                target_name: target.name,
                requester_name: requester.name,
            })
        })
    }

    /// Accepts or rejects an offer addressed to the player.
    ///
    /// Acceptance re-checks the team against the capacity ceiling, moves the
    /// player onto the team and rejects every other offer still pending for them.
    pub fn respond(&self, account_id: &str, request_id: i64, accept: bool) -> LeagueResult<RecruitResolution> {
        let decision = RecruitDecision::from_accept(accept);

        in_transaction(self.pool, |tx| {
            let player = find_player(tx, account_id)?;
            let request = recruits::find_by_id(tx, request_id)?
                .ok_or_else(|| LeagueError::NotFound("Recruit request not found".to_string()))?;
            if request.target_player_id != player.id {
                return Err(LeagueError::Forbidden(
                    "This recruit request is addressed to someone else".to_string(),
                ));
            }
            let status = request.status.resolve(decision)?;
            let team = teams::find_by_id(tx, request.team_id)?
                .ok_or_else(|| LeagueError::NotFound("Team not found".to_string()))?;

            let mut rejected_others = 0;
            if decision == RecruitDecision::Accept {
                if player.team_id == Some(team.id) {
                    return Err(LeagueError::Conflict("You are already on this team".to_string()));
                }
                if let Some(led) = teams::find_by_leader(tx, player.id)? {
                    return Err(LeagueError::Conflict(format!(
                        "Disband team {} before joining another team",
                        led.name
                    )));
                }

                let roster = players::roster(tx, team.id)?;
                if let Err(e) = self.policy.ensure_admissible(&roster, player.score) {
                    info!("{} could not join {}: {}", account_id, team.name, e);
                    return Err(e);
                }

                players::set_team(tx, player.id, Some(team.id))?;
                rejected_others = recruits::reject_other_pending(tx, player.id, request.id)?;
                info!(
                    "{} joined team {} ({} competing offers rejected)",
                    account_id, team.name, rejected_others
                );
            }
            recruits::set_status(tx, request.id, status)?;

            let requester_name = player_name(tx, request.requester_id)?;
            Ok(RecruitResolution {
                entry: RecruitEntry {
                    request: RecruitRequest { status, ..request },
                    team_name: team.name,
                    target_name: player.name,
                    requester_name,
                },
                rejected_others,
            })
        })
    }

    /// Offers waiting on the player
    pub fn inbox(&self, account_id: &str) -> LeagueResult<Vec<RecruitEntry>> {
        let conn = database::get_connection(self.pool)?;
        let player = find_player(&conn, account_id)?;
        let requests = recruits::list_pending_for_target(&conn, player.id)?;
        describe(&conn, requests)
    }

    /// Open offers sent by the team the player leads
    pub fn outbox(&self, account_id: &str) -> LeagueResult<Vec<RecruitEntry>> {
        let conn = database::get_connection(self.pool)?;
        let player = find_player(&conn, account_id)?;
        let team = current_team(&conn, &player)?;
        if team.leader_id != player.id {
            return Err(LeagueError::Forbidden(
                "Only the team leader can view the team's requests".to_string(),
            ));
        }
        let requests = recruits::list_pending_for_team(&conn, team.id)?;
        describe(&conn, requests)
    }
}

fn player_name(conn: &Connection, player_id: i64) -> LeagueResult<String> {
    Ok(players::find_by_id(conn, player_id)?
        .map(|p| p.name)
        .unwrap_or_default())
}

fn describe(conn: &Connection, requests: Vec<RecruitRequest>) -> LeagueResult<Vec<RecruitEntry>> {
    requests
        .into_iter()
        .map(|request| {
            let team_name = teams::find_by_id(conn, request.team_id)?
                .map(|t| t.name)
                .unwrap_or_default();
            Ok(RecruitEntry {
                team_name,
                target_name: player_name(conn, request.target_player_id)?,
                requester_name: player_name(conn, request.requester_id)?,
                request,
            })
        })
        .collect()
}
