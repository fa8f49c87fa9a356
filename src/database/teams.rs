use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Team;
use crate::league::TeamRoster;

const TEAM_COLUMNS: &str = "id, name, leader_id, created_at";

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        leader_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn insert_team(conn: &Connection, name: &str, leader_id: i64) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (name, leader_id) VALUES (?1, ?2) RETURNING {}",
        TEAM_COLUMNS
    );

    conn.query_row(&sql, params![name, leader_id], parse_team_row)
        .context("Failed to insert team")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Team>> {
    let sql = format!("SELECT {} FROM teams WHERE id = ?1", TEAM_COLUMNS);

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

/// Case-insensitive lookup, used to keep team names unique
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Team>> {
    let sql = format!(
        "SELECT {} FROM teams WHERE LOWER(name) = LOWER(?1)",
        TEAM_COLUMNS
    );

    conn.query_row(&sql, params![name], parse_team_row)
        .optional()
        .context("Failed to query team by name")
}

pub fn find_by_leader(conn: &Connection, leader_id: i64) -> Result<Option<Team>> {
    let sql = format!("SELECT {} FROM teams WHERE leader_id = ?1", TEAM_COLUMNS);

    conn.query_row(&sql, params![leader_id], parse_team_row)
        .optional()
        .context("Failed to query team by leader")
}

/// Removes the team; members are detached and its requests go with it
pub fn delete_team(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM teams WHERE id = ?1", params![id])
        .context("Failed to delete team")
        .map(|_| ())
}

/// All teams with their rosters, strongest first
pub fn list_with_rosters(conn: &Connection) -> Result<Vec<(Team, TeamRoster)>> {
    let sql = "SELECT t.id, t.name, t.leader_id, t.created_at, COUNT(p.id), COALESCE(SUM(p.score), 0) AS total
               FROM teams t
               LEFT JOIN players p ON p.team_id = t.id
               GROUP BY t.id
               ORDER BY total DESC, t.id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            let team = parse_team_row(row)?;
            let count: i64 = row.get(4)?;
            let roster = TeamRoster {
                member_count: count as usize,
                total_score: row.get(5)?,
            };
            Ok((team, roster))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list teams")?;

    Ok(rows)
}
