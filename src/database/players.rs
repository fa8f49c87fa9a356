use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::models::{NewPlayer, Player, PlayerFilter, RiotLink};
use super::{required_text_column, text_column};
use crate::league::TeamRoster;
use crate::scoring::{PlayerRankProfile, RankPoint};

const PLAYER_COLUMNS: &str = "id, account_id, name, grade, class_num, num, role, summoner_handle, summoner_id, puuid, current_tier, current_division, all_time_tier, all_time_division, account_level, mastery_signal, score, most_lane, second_lane, team_id, created_at";

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        account_id: row.get(1)?,
        name: row.get(2)?,
        grade: row.get(3)?,
        class_num: row.get(4)?,
        num: row.get(5)?,
        role: required_text_column(row, 6)?,
        summoner_handle: row.get(7)?,
        summoner_id: row.get(8)?,
        puuid: row.get(9)?,
        current_rank: parse_rank(row, 10)?,
        all_time_highest: parse_rank(row, 12)?,
        account_level: row.get(14)?,
        mastery_signal: row.get(15)?,
        score: row.get(16)?,
        most_lane: text_column(row, 17)?,
        second_lane: text_column(row, 18)?,
        team_id: row.get(19)?,
        created_at: row.get(20)?,
    })
}

/// Tier at `idx`, division at `idx + 1`
fn parse_rank(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<RankPoint>> {
    let tier = text_column(row, idx)?;
    let division = text_column(row, idx + 1)?;
    Ok(tier.map(|tier| RankPoint::new(tier, division)))
}

fn rank_columns(rank: Option<RankPoint>) -> (Option<&'static str>, Option<&'static str>) {
    match rank {
        Some(point) => (Some(point.tier.as_str()), point.division.map(|d| d.as_str())),
        None => (None, None),
    }
}

fn find_one(conn: &Connection, column: &str, value: &dyn ToSql) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE {} = ?1", PLAYER_COLUMNS, column);

    conn.query_row(&sql, [value], parse_player_row)
        .optional()
        .with_context(|| format!("Failed to query player by {}", column))
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Player>> {
    find_one(conn, "id", &id)
}

pub fn find_by_account_id(conn: &Connection, account_id: &str) -> Result<Option<Player>> {
    find_one(conn, "account_id", &account_id)
}

pub fn find_by_puuid(conn: &Connection, puuid: &str) -> Result<Option<Player>> {
    find_one(conn, "puuid", &puuid)
}

pub fn find_by_summoner_handle(conn: &Connection, handle: &str) -> Result<Option<Player>> {
    find_one(conn, "summoner_handle", &handle)
}

pub fn insert_player(conn: &Connection, player: &NewPlayer) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (account_id, name, grade, class_num, num, role) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {}",
        PLAYER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            player.account_id,
            player.name,
            player.grade,
            player.class_num,
            player.num,
            player.role.as_str()
        ],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

/// Players matching the filter, strongest first
pub fn list(conn: &Connection, filter: &PlayerFilter) -> Result<Vec<Player>> {
    let mut sql = format!("SELECT {} FROM players WHERE 1 = 1", PLAYER_COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(tier) = filter.tier {
        sql.push_str(" AND current_tier = ?");
        args.push(Box::new(tier.as_str()));
    }
    if let Some(name) = filter.name_contains.as_deref().filter(|n| !n.trim().is_empty()) {
        sql.push_str(" AND LOWER(name) LIKE ? ESCAPE '\\'");
        args.push(Box::new(like_pattern(&name.trim().to_lowercase())));
    }
    match filter.has_team {
        Some(true) => sql.push_str(" AND team_id IS NOT NULL"),
        Some(false) => sql.push_str(" AND team_id IS NULL"),
        None => {}
    }
    sql.push_str(" ORDER BY score DESC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players")?;

    Ok(rows)
}

/// Substring pattern with LIKE wildcards in `needle` matched literally
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn list_members(conn: &Connection, team_id: i64) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players WHERE team_id = ?1 ORDER BY id ASC",
        PLAYER_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Every player with a linked Riot account
pub fn list_linked(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players WHERE puuid IS NOT NULL ORDER BY id ASC",
        PLAYER_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM players ORDER BY id ASC")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(ids)
}

pub fn roster(conn: &Connection, team_id: i64) -> Result<TeamRoster> {
    let sql = "SELECT COUNT(*), COALESCE(SUM(score), 0) FROM players WHERE team_id = ?1";

    conn.query_row(sql, params![team_id], |row| {
        let count: i64 = row.get(0)?;
        Ok(TeamRoster {
            member_count: count as usize,
            total_score: row.get(1)?,
        })
    })
    .context("Failed to compute team roster")
}

pub fn set_team(conn: &Connection, player_id: i64, team_id: Option<i64>) -> Result<()> {
    let sql = "UPDATE players SET team_id = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2";

    conn.execute(sql, params![team_id, player_id])
        .context("Failed to update player team")
        .map(|_| ())
}

/// Detaches every member of a team, returning how many were detached
pub fn clear_team(conn: &Connection, team_id: i64) -> Result<usize> {
    let sql = "UPDATE players SET team_id = NULL, updated_at = CURRENT_TIMESTAMP WHERE team_id = ?1";

    conn.execute(sql, params![team_id])
        .context("Failed to detach team members")
}

pub fn link_riot_account(conn: &Connection, player_id: i64, link: &RiotLink) -> Result<()> {
    let sql = "UPDATE players SET summoner_handle = ?1, summoner_id = ?2, puuid = ?3, most_lane = ?4, second_lane = ?5, updated_at = CURRENT_TIMESTAMP WHERE id = ?6";

    conn.execute(
        sql,
        params![
            link.summoner_handle,
            link.summoner_id,
            link.puuid,
            link.most_lane.as_str(),
            link.second_lane.as_str(),
            player_id
        ],
    )
    .context("Failed to link Riot account")
    .map(|_| ())
}

/// Stores the score inputs together with the score derived from them
pub fn save_rank_profile(
    conn: &Connection,
    player_id: i64,
    profile: &PlayerRankProfile,
    score: i32,
) -> Result<()> {
    let (current_tier, current_division) = rank_columns(profile.current_season);
    let (all_time_tier, all_time_division) = rank_columns(profile.all_time_highest);
    let sql = "UPDATE players SET current_tier = ?1, current_division = ?2, all_time_tier = ?3, all_time_division = ?4, account_level = ?5, mastery_signal = ?6, score = ?7, updated_at = CURRENT_TIMESTAMP WHERE id = ?8";

    conn.execute(
        sql,
        params![
            current_tier,
            current_division,
            all_time_tier,
            all_time_division,
            profile.account_level,
            profile.mastery_signal,
            score,
            player_id
        ],
    )
    .context("Failed to save rank profile")
    .map(|_| ())
}
