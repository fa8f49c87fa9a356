use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::RecruitRequest;
use super::required_text_column;
use crate::league::RecruitStatus;

const REQUEST_COLUMNS: &str =
    "id, team_id, target_player_id, requester_id, status, message, created_at";

fn parse_request_row(row: &rusqlite::Row) -> rusqlite::Result<RecruitRequest> {
    Ok(RecruitRequest {
        id: row.get(0)?,
        team_id: row.get(1)?,
        target_player_id: row.get(2)?,
        requester_id: row.get(3)?,
        status: required_text_column(row, 4)?,
        message: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn insert_request(
    conn: &Connection,
    team_id: i64,
    target_player_id: i64,
    requester_id: i64,
    message: Option<&str>,
) -> Result<RecruitRequest> {
    let sql = format!(
        "INSERT INTO recruit_requests (team_id, target_player_id, requester_id, message) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        REQUEST_COLUMNS
    );

    conn.query_row(
        &sql,
        params![team_id, target_player_id, requester_id, message],
        parse_request_row,
    )
    .context("Failed to insert recruit request")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<RecruitRequest>> {
    let sql = format!("SELECT {} FROM recruit_requests WHERE id = ?1", REQUEST_COLUMNS);

    conn.query_row(&sql, params![id], parse_request_row)
        .optional()
        .context("Failed to query recruit request")
}

pub fn exists_pending(conn: &Connection, team_id: i64, target_player_id: i64) -> Result<bool> {
    let sql = "SELECT EXISTS(SELECT 1 FROM recruit_requests WHERE team_id = ?1 AND target_player_id = ?2 AND status = 'PENDING')";

    conn.query_row(sql, params![team_id, target_player_id], |row| row.get(0))
        .context("Failed to check pending requests")
}

pub fn set_status(conn: &Connection, id: i64, status: RecruitStatus) -> Result<()> {
    let sql = "UPDATE recruit_requests SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2";

    conn.execute(sql, params![status.as_str(), id])
        .context("Failed to update recruit request status")
        .map(|_| ())
}

/// Rejects every other offer still waiting on the player; returns how many
pub fn reject_other_pending(conn: &Connection, target_player_id: i64, keep_id: i64) -> Result<usize> {
    let sql = "UPDATE recruit_requests SET status = 'REJECTED', updated_at = CURRENT_TIMESTAMP
               WHERE target_player_id = ?1 AND status = 'PENDING' AND id <> ?2";

    conn.execute(sql, params![target_player_id, keep_id])
        .context("Failed to reject remaining offers")
}

/// Offers waiting on a player, newest first
pub fn list_pending_for_target(conn: &Connection, target_player_id: i64) -> Result<Vec<RecruitRequest>> {
    let sql = format!(
        "SELECT {} FROM recruit_requests WHERE target_player_id = ?1 AND status = 'PENDING' ORDER BY created_at DESC, id DESC",
        REQUEST_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![target_player_id], parse_request_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Offers a team has sent that are still open, newest first
pub fn list_pending_for_team(conn: &Connection, team_id: i64) -> Result<Vec<RecruitRequest>> {
    let sql = format!(
        "SELECT {} FROM recruit_requests WHERE team_id = ?1 AND status = 'PENDING' ORDER BY created_at DESC, id DESC",
        REQUEST_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_request_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
