use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::{Player, Team};
use crate::domain::{Lane, UserRole};
use crate::league::RecruitStatus;
use crate::scoring::{explain_score, Division, RankPoint, ScoreBreakdown, Tier};
use crate::services::{PlayerEntry, RecruitEntry, TeamDetails};

/// Envelope every endpoint answers with
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

// --- Requests ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub account_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiotAccountRequest {
    pub game_name: String,
    pub tag_line: String,
    pub most_lane: Lane,
    pub second_lane: Lane,
}

#[derive(Debug, Deserialize)]
pub struct TopTierRequest {
    pub tier: Tier,
    pub rank: Option<Division>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub tier: Option<Tier>,
    pub name: Option<String>,
    pub has_team: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TeamCreateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitCreateRequest {
    pub target_user_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecruitDecisionRequest {
    pub accept: bool,
}

// --- Responses ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdownResponse {
    pub base_tier: Tier,
    pub base_rank: Option<Division>,
    pub base_score: i32,
    pub level_floor: i32,
    pub mastery_benefit: i32,
    pub total: i32,
}

impl From<ScoreBreakdown> for ScoreBreakdownResponse {
    fn from(breakdown: ScoreBreakdown) -> Self {
        Self {
            base_tier: breakdown.base_rank.tier,
            base_rank: breakdown.base_rank.division,
            base_score: breakdown.base_score,
            level_floor: breakdown.level_floor,
            mastery_benefit: breakdown.mastery_signal,
            total: breakdown.total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub account_id: String,
    pub name: String,
    pub grade: i32,
    pub class_num: i32,
    pub num: i32,
    pub user_role: UserRole,
    pub summoner_name: Option<String>,
    pub tier: Option<Tier>,
    pub rank: Option<Division>,
    pub all_time_highest_tier: Option<Tier>,
    pub all_time_highest_rank: Option<Division>,
    pub level: i64,
    pub mastery_benefit: i32,
    pub score: i32,
    pub score_breakdown: ScoreBreakdownResponse,
    pub most_lane: Option<Lane>,
    pub second_lane: Option<Lane>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub is_team_leader: bool,
}

impl UserResponse {
    pub fn new(player: &Player, team: Option<&Team>) -> Self {
        let (tier, rank) = split_rank(player.current_rank);
        let (all_time_highest_tier, all_time_highest_rank) = split_rank(player.all_time_highest);

        Self {
            id: player.id,
            account_id: player.account_id.clone(),
            name: player.name.clone(),
            grade: player.grade,
            class_num: player.class_num,
            num: player.num,
            user_role: player.role,
            summoner_name: player.summoner_handle.clone(),
            tier,
            rank,
            all_time_highest_tier,
            all_time_highest_rank,
            level: player.account_level,
            mastery_benefit: player.mastery_signal,
            score: player.score,
            score_breakdown: explain_score(&player.rank_profile()).into(),
            most_lane: player.most_lane,
            second_lane: player.second_lane,
            team_id: team.map(|t| t.id),
            team_name: team.map(|t| t.name.clone()),
            is_team_leader: team.is_some_and(|t| t.leader_id == player.id),
        }
    }
}

impl From<&PlayerEntry> for UserResponse {
    fn from(entry: &PlayerEntry) -> Self {
        UserResponse::new(&entry.player, entry.team.as_ref())
    }
}

fn split_rank(rank: Option<RankPoint>) -> (Option<Tier>, Option<Division>) {
    match rank {
        Some(point) => (Some(point.tier), point.division),
        None => (None, None),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

impl UserListResponse {
    pub fn new(entries: &[PlayerEntry]) -> Self {
        let users: Vec<UserResponse> = entries.iter().map(UserResponse::from).collect();
        Self {
            total: users.len(),
            users,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub leader: UserResponse,
    pub members: Vec<UserResponse>,
    pub total_score: i64,
    pub member_count: usize,
    pub can_recruit: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl From<&TeamDetails> for TeamResponse {
    fn from(details: &TeamDetails) -> Self {
        let team = &details.team;
        Self {
            id: team.id,
            name: team.name.clone(),
            leader: UserResponse::new(&details.leader, Some(team)),
            members: details
                .members
                .iter()
                .map(|member| UserResponse::new(member, Some(team)))
                .collect(),
            total_score: details.roster.total_score,
            member_count: details.roster.member_count,
            can_recruit: details.can_recruit,
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamListResponse {
    pub teams: Vec<TeamResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitResponse {
    pub id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub target_user_id: i64,
    pub target_user_name: String,
    pub requester_name: String,
    pub status: RecruitStatus,
    pub message: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl From<&RecruitEntry> for RecruitResponse {
    fn from(entry: &RecruitEntry) -> Self {
        let request = &entry.request;
        Self {
            id: request.id,
            team_id: request.team_id,
            team_name: entry.team_name.clone(),
            target_user_id: request.target_player_id,
            target_user_name: entry.target_name.clone(),
            requester_name: entry.requester_name.clone(),
            status: request.status,
            message: request.message.clone(),
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitListResponse {
    pub requests: Vec<RecruitResponse>,
    pub total: usize,
}

impl RecruitListResponse {
    pub fn new(entries: &[RecruitEntry]) -> Self {
        let requests: Vec<RecruitResponse> = entries.iter().map(RecruitResponse::from).collect();
        Self {
            total: requests.len(),
            requests,
        }
    }
}
