use log::info;
use rusqlite::Connection;

use crate::config::settings::AppConfig;
use crate::database::{self, in_transaction, players, teams, DbPool, Player, Team};
use crate::errors::{LeagueError, LeagueResult};
use crate::league::{CapacityPolicy, TeamRoster};

const TEAM_NAME_CHARS: std::ops::RangeInclusive<usize> = 2..=20;

/// A team with its members and standing against the capacity ceiling
#[derive(Debug, Clone)]
pub struct TeamDetails {
    pub team: Team,
    pub leader: Player,
    pub members: Vec<Player>,
    pub roster: TeamRoster,
    pub can_recruit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The leader left, so the team was removed and every member detached
    Disbanded { team_name: String, detached: usize },
    Left { team_name: String },
}

impl LeaveOutcome {
    pub fn message(&self) -> String {
        match self {
            LeaveOutcome::Disbanded { team_name, .. } => format!("Team {} has been disbanded", team_name),
            LeaveOutcome::Left { team_name } => format!("You left team {}", team_name),
        }
    }
}

pub struct TeamService<'a> {
    pool: &'a DbPool,
    policy: CapacityPolicy,
}

impl<'a> TeamService<'a> {
    pub fn new(pool: &'a DbPool, config: &AppConfig) -> Self {
        Self {
            pool,
            policy: config.league.capacity_policy(),
        }
    }

    pub fn create(&self, account_id: &str, name: &str) -> LeagueResult<TeamDetails> {
        let name = validate_team_name(name)?;

        in_transaction(self.pool, |tx| {
            let player = find_player(tx, account_id)?;
            if player.team_id.is_some() {
                return Err(LeagueError::Conflict("You already belong to a team".to_string()));
            }
            if teams::find_by_leader(tx, player.id)?.is_some() {
                return Err(LeagueError::Conflict("You already lead a team".to_string()));
            }
            if teams::find_by_name(tx, &name)?.is_some() {
                return Err(LeagueError::Conflict(format!("Team name {} is already taken", name)));
            }

            let team = teams::insert_team(tx, &name, player.id)?;
            players::set_team(tx, player.id, Some(team.id))?;
            info!("{} created team {}", account_id, team.name);

            self.details(tx, team)
        })
    }

    /// Every team, strongest first; rosters come from the same aggregate the ordering uses
    pub fn list(&self) -> LeagueResult<Vec<TeamDetails>> {
        let conn = database::get_connection(self.pool)?;
        teams::list_with_rosters(&conn)?
            .into_iter()
            .map(|(team, roster)| {
                let members = players::list_members(&conn, team.id)?;
                self.assemble(&conn, team, members, roster)
            })
            .collect()
    }

    pub fn get(&self, team_id: i64) -> LeagueResult<TeamDetails> {
        let conn = database::get_connection(self.pool)?;
        let team = teams::find_by_id(&conn, team_id)?
            .ok_or_else(|| LeagueError::NotFound("Team not found".to_string()))?;
        self.details(&conn, team)
    }

    pub fn my_team(&self, account_id: &str) -> LeagueResult<Option<TeamDetails>> {
        let conn = database::get_connection(self.pool)?;
        let player = find_player(&conn, account_id)?;
        let Some(team_id) = player.team_id else {
            return Ok(None);
        };
        match teams::find_by_id(&conn, team_id)? {
            Some(team) => self.details(&conn, team).map(Some),
            None => Ok(None),
        }
    }

    /// Leaving as leader disbands the team; anyone else just leaves
    pub fn leave(&self, account_id: &str) -> LeagueResult<LeaveOutcome> {
        in_transaction(self.pool, |tx| {
            let player = find_player(tx, account_id)?;
            let team = current_team(tx, &player)?;

            if team.leader_id == player.id {
                let detached = players::clear_team(tx, team.id)?;
                teams::delete_team(tx, team.id)?;
                info!("{} disbanded team {} ({} members detached)", account_id, team.name, detached);
                return Ok(LeaveOutcome::Disbanded {
                    team_name: team.name,
                    detached,
                });
            }

            players::set_team(tx, player.id, None)?;
            info!("{} left team {}", account_id, team.name);
            Ok(LeaveOutcome::Left { team_name: team.name })
        })
    }

    /// Removes a member; only the leader may do this and never to themselves
    pub fn kick(&self, leader_account_id: &str, target_player_id: i64) -> LeagueResult<Player> {
        in_transaction(self.pool, |tx| {
            let leader = find_player(tx, leader_account_id)?;
            let team = current_team(tx, &leader)?;
            if team.leader_id != leader.id {
                return Err(LeagueError::Forbidden("Only the team leader can kick members".to_string()));
            }

            let target = players::find_by_id(tx, target_player_id)?
                .ok_or_else(|| LeagueError::NotFound("Target user not found".to_string()))?;
            if target.team_id != Some(team.id) {
                return Err(LeagueError::Conflict(format!("{} is not a member of this team", target.name)));
            }
            if target.id == team.leader_id {
                return Err(LeagueError::Conflict("The team leader cannot be kicked".to_string()));
            }

            players::set_team(tx, target.id, None)?;
            info!("{} kicked {} from team {}", leader_account_id, target.account_id, team.name);
            Ok(Player {
                team_id: None,
                ..target
            })
        })
    }

    fn details(&self, conn: &Connection, team: Team) -> LeagueResult<TeamDetails> {
        let members = players::list_members(conn, team.id)?;
        let roster = TeamRoster::from_scores(members.iter().map(|m| m.score));
        self.assemble(conn, team, members, roster)
    }

    fn assemble(
        &self,
        conn: &Connection,
        team: Team,
        members: Vec<Player>,
        roster: TeamRoster,
    ) -> LeagueResult<TeamDetails> {
        let leader = match members.iter().find(|m| m.id == team.leader_id) {
            Some(leader) => leader.clone(),
            None => players::find_by_id(conn, team.leader_id)?
                .ok_or_else(|| LeagueError::NotFound("Team leader not found".to_string()))?,
        };

        Ok(TeamDetails {
            can_recruit: self.policy.has_open_slot(&roster),
            team,
            leader,
            members,
            roster,
        })
    }
}

fn validate_team_name(name: &str) -> LeagueResult<String> {
    let name = name.trim();
    if !TEAM_NAME_CHARS.contains(&name.chars().count()) {
        return Err(LeagueError::InvalidInput(format!(
            "Team name must be between {} and {} characters",
            TEAM_NAME_CHARS.start(),
            TEAM_NAME_CHARS.end()
        )));
    }
    Ok(name.to_string())
}

pub(crate) fn find_player(conn: &Connection, account_id: &str) -> LeagueResult<Player> {
    players::find_by_account_id(conn, account_id)?
        .ok_or_else(|| LeagueError::NotFound("User not found".to_string()))
}

pub(crate) fn current_team(conn: &Connection, player: &Player) -> LeagueResult<Team> {
    let not_in_team = || LeagueError::NotFound("You are not in a team".to_string());
    let team_id = player.team_id.ok_or_else(not_in_team)?;
    teams::find_by_id(conn, team_id)?.ok_or_else(not_in_team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_test_pool, get_connection};
    use crate::database::recruits;
    use crate::test_support::{reload, seed_player, seed_team};

    #[test]
    fn test_create_team() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        seed_player(&get_connection(&pool).unwrap(), "lead", 12);

        let details = service.create("lead", "  Night Owls ").unwrap();
        assert_eq!(details.team.name, "Night Owls");
        assert_eq!(details.leader.account_id, "lead");
        assert_eq!(details.roster, TeamRoster { member_count: 1, total_score: 12 });
        assert!(details.can_recruit);

        let again = service.create("lead", "Other");
        assert!(matches!(again, Err(LeagueError::Conflict(_))));
    }

    #[test]
    fn test_team_name_rules() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        let conn = get_connection(&pool).unwrap();
        seed_player(&conn, "a", 5);
        seed_player(&conn, "b", 5);

        assert!(matches!(service.create("a", "X"), Err(LeagueError::InvalidInput(_))));
        assert!(matches!(
            service.create("a", "abcdefghijklmnopqrstu"),
            Err(LeagueError::InvalidInput(_))
        ));
        // Length counts characters, not bytes
        service.create("a", "밤부엉이").unwrap();
        assert!(matches!(service.create("b", "밤부엉이"), Err(LeagueError::Conflict(_))));
    }

    #[test]
    fn test_leader_leaving_disbands_team() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        let conn = get_connection(&pool).unwrap();
        let leader = seed_player(&conn, "lead", 10);
        let first = seed_player(&conn, "m1", 10);
        let second = seed_player(&conn, "m2", 10);
        let outsider = seed_player(&conn, "out", 10);
        let team = seed_team(&conn, "Owls", &leader, &[&first, &second]);
        recruits::insert_request(&conn, team.id, outsider.id, leader.id, None).unwrap();

        let outcome = service.leave("lead").unwrap();
        assert_eq!(
            outcome,
            LeaveOutcome::Disbanded {
                team_name: "Owls".to_string(),
                detached: 3
            }
        );
        for player in [&leader, &first, &second] {
            assert_eq!(reload(&conn, player).team_id, None);
        }
        assert!(teams::find_by_id(&conn, team.id).unwrap().is_none());
        assert!(recruits::list_pending_for_target(&conn, outsider.id).unwrap().is_empty());
    }

    #[test]
    fn test_member_leaving_keeps_team() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        let conn = get_connection(&pool).unwrap();
        let leader = seed_player(&conn, "lead", 10);
        let member = seed_player(&conn, "m1", 7);
        let team = seed_team(&conn, "Owls", &leader, &[&member]);

        assert_eq!(
            service.leave("m1").unwrap(),
            LeaveOutcome::Left { team_name: "Owls".to_string() }
        );
        assert_eq!(service.get(team.id).unwrap().roster.member_count, 1);
        assert!(matches!(service.leave("m1"), Err(LeagueError::NotFound(_))));
    }

    #[test]
    fn test_kick_rules() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        let conn = get_connection(&pool).unwrap();
        let leader = seed_player(&conn, "lead", 10);
        let member = seed_player(&conn, "m1", 7);
        let stranger = seed_player(&conn, "x", 7);
        seed_team(&conn, "Owls", &leader, &[&member]);

        assert!(matches!(service.kick("m1", leader.id), Err(LeagueError::Forbidden(_))));
        assert!(matches!(service.kick("lead", leader.id), Err(LeagueError::Conflict(_))));
        assert!(matches!(service.kick("lead", stranger.id), Err(LeagueError::Conflict(_))));
        assert!(matches!(service.kick("lead", 9999), Err(LeagueError::NotFound(_))));

        let kicked = service.kick("lead", member.id).unwrap();
        assert_eq!(kicked.team_id, None);
        assert_eq!(reload(&conn, &member).team_id, None);
    }

    #[test]
    fn test_list_orders_by_total_score() {
        let pool = create_test_pool();
        let config = AppConfig::new();
        let service = TeamService::new(&pool, &config);
        let conn = get_connection(&pool).unwrap();
        let weak = seed_player(&conn, "weak", 5);
        let strong = seed_player(&conn, "strong", 20);
        let helper = seed_player(&conn, "helper", 3);
        seed_team(&conn, "Weak", &weak, &[&helper]);
        seed_team(&conn, "Strong", &strong, &[]);

        let listed = service.list().unwrap();
        let names: Vec<_> = listed.iter().map(|d| d.team.name.as_str()).collect();
        assert_eq!(names, vec!["Strong", "Weak"]);
        assert_eq!(listed[0].roster, TeamRoster { member_count: 1, total_score: 20 });
        assert_eq!(listed[1].roster, TeamRoster { member_count: 2, total_score: 8 });
        assert_eq!(listed[1].members.len(), 2);
        assert_eq!(listed[1].leader.account_id, "weak");
        assert!(service.my_team("helper").unwrap().is_some());
    }
}
