use chrono::NaiveDateTime;

use crate::domain::{Lane, UserRole};
use crate::league::RecruitStatus;
use crate::scoring::{PlayerRankProfile, RankPoint, Tier};

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub account_id: String,
    pub name: String,
    pub grade: i32,
    pub class_num: i32,
    pub num: i32,
    pub role: UserRole,
    pub summoner_handle: Option<String>,
    pub summoner_id: Option<String>,
    pub puuid: Option<String>,
    pub current_rank: Option<RankPoint>,
    pub all_time_highest: Option<RankPoint>,
    pub account_level: i64,
    pub mastery_signal: i32,
    pub score: i32,
    pub most_lane: Option<Lane>,
    pub second_lane: Option<Lane>,
    pub team_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Player {
    pub fn rank_profile(&self) -> PlayerRankProfile {
        PlayerRankProfile {
            current_season: self.current_rank,
            all_time_highest: self.all_time_highest,
            account_level: self.account_level,
            mastery_signal: self.mastery_signal,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.puuid.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewPlayer<'a> {
    pub account_id: &'a str,
    pub name: &'a str,
    pub grade: i32,
    pub class_num: i32,
    pub num: i32,
    pub role: UserRole,
}

/// Riot account details written when a player links their account
#[derive(Debug, Clone)]
pub struct RiotLink<'a> {
    pub summoner_handle: &'a str,
    pub summoner_id: Option<&'a str>,
    pub puuid: &'a str,
    pub most_lane: Lane,
    pub second_lane: Lane,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub leader_id: i64,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct RecruitRequest {
    pub id: i64,
    pub team_id: i64,
    pub target_player_id: i64,
    pub requester_id: i64,
    pub status: RecruitStatus,
    pub message: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub tier: Option<Tier>,
    pub name_contains: Option<String>,
    pub has_team: Option<bool>,
}
