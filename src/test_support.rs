//! Seeding helpers and in-memory upstream fakes shared by the unit tests.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};

use crate::database::{players, teams, NewPlayer, Player, Team};
use crate::domain::{
    PeakRankLookup, PeakRanks, RiotAccount, RiotGateway, RiotId, SchoolCredentials, SchoolDirectory,
    SchoolUser, UserRole,
};
use crate::scoring::{MatchRecord, PlayerRankProfile, RankPoint};

/// Inserts a player with the given score and nothing else
pub fn seed_player(conn: &Connection, account_id: &str, score: i32) -> Player {
    let player = players::insert_player(
        conn,
        &NewPlayer {
            account_id,
            name: account_id,
            grade: 1,
            class_num: 1,
            num: 1,
            role: UserRole::Stu,
        },
    )
    .unwrap();
    players::save_rank_profile(conn, player.id, &PlayerRankProfile::default(), score).unwrap();
    players::find_by_id(conn, player.id).unwrap().unwrap()
}

/// Creates a team led by `leader` with the given members already on it
pub fn seed_team(conn: &Connection, name: &str, leader: &Player, members: &[&Player]) -> Team {
    let team = teams::insert_team(conn, name, leader.id).unwrap();
    players::set_team(conn, leader.id, Some(team.id)).unwrap();
    for member in members {
        players::set_team(conn, member.id, Some(team.id)).unwrap();
    }
    team
}

pub fn reload(conn: &Connection, player: &Player) -> Player {
    players::find_by_id(conn, player.id).unwrap().unwrap()
}

pub fn school_user(account_id: &str, name: &str) -> SchoolUser {
    SchoolUser {
        account_id: account_id.to_string(),
        name: name.to_string(),
        grade: 2,
        class_num: 4,
        num: 11,
        role: UserRole::Stu,
    }
}

#[derive(Default)]
pub struct FakeSchool {
    /// account id to (password, user)
    pub users: HashMap<String, (String, SchoolUser)>,
    pub unavailable: bool,
}

impl FakeSchool {
    pub fn with_user(mut self, user: SchoolUser, password: &str) -> Self {
        self.users.insert(user.account_id.clone(), (password.to_string(), user));
        self
    }
}

impl SchoolDirectory for FakeSchool {
    async fn authenticate(&self, credentials: &SchoolCredentials) -> Result<Option<SchoolUser>> {
        if self.unavailable {
            return Err(anyhow!("connection refused"));
        }
        Ok(self
            .users
            .get(&credentials.account_id)
            .filter(|(password, _)| *password == credentials.password)
            .map(|(_, user)| user.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSummoner {
    pub puuid: String,
    pub level: i64,
    pub rank: Option<RankPoint>,
    pub matches: Vec<MatchRecord>,
}

#[derive(Default)]
pub struct FakeRiot {
    /// Riot ID handle to summoner
    pub summoners: HashMap<String, FakeSummoner>,
    pub failing_ranks: HashSet<String>,
    pub failing_levels: HashSet<String>,
    pub failing_matches: bool,
}

impl FakeRiot {
    pub fn with_summoner(mut self, handle: &str, summoner: FakeSummoner) -> Self {
        self.summoners.insert(handle.to_string(), summoner);
        self
    }

    fn by_puuid(&self, puuid: &str) -> Option<&FakeSummoner> {
        self.summoners.values().find(|s| s.puuid == puuid)
    }
}

impl RiotGateway for FakeRiot {
    async fn resolve_account(&self, riot_id: &RiotId) -> Result<Option<RiotAccount>> {
        Ok(self.summoners.get(&riot_id.handle()).map(|s| RiotAccount {
            puuid: s.puuid.clone(),
            summoner_id: Some(format!("summoner-{}", s.puuid)),
        }))
    }

    async fn current_rank(&self, puuid: &str) -> Result<Option<RankPoint>> {
        if self.failing_ranks.contains(puuid) {
            return Err(anyhow!("timed out"));
        }
        Ok(self.by_puuid(puuid).and_then(|s| s.rank))
    }

    async fn account_level(&self, puuid: &str) -> Result<Option<i64>> {
        if self.failing_levels.contains(puuid) {
            return Err(anyhow!("timed out"));
        }
        Ok(self.by_puuid(puuid).map(|s| s.level))
    }

    async fn recent_ranked_matches(
        &self,
        puuid: &str,
        since: DateTime<Utc>,
        max_count: usize,
    ) -> Result<Vec<MatchRecord>> {
        if self.failing_matches {
            return Err(anyhow!("rate limited"));
        }
        Ok(self
            .by_puuid(puuid)
            .map(|s| {
                s.matches
                    .iter()
                    .take_while(|m| m.played_at >= since)
                    .take(max_count)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakePeaks {
    pub peaks: HashMap<String, PeakRanks>,
    pub unavailable: bool,
}

impl FakePeaks {
    pub fn with_peaks(mut self, handle: &str, peaks: PeakRanks) -> Self {
        self.peaks.insert(handle.to_string(), peaks);
        self
    }
}

impl PeakRankLookup for FakePeaks {
    async fn peak_ranks(&self, riot_id: &RiotId) -> Result<PeakRanks> {
        if self.unavailable {
            return Err(anyhow!("503 Service Unavailable"));
        }
        Ok(self.peaks.get(&riot_id.handle()).cloned().unwrap_or_default())
    }
}
