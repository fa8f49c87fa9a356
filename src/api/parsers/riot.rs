use anyhow::{Context, Result};
use chrono::DateTime;
use log::warn;
use serde::Deserialize;

use crate::errors::parse_context;
use crate::scoring::{Division, MatchRecord, RankPoint, Tier};

/// Queue type of ranked solo/duo in league-v4 entries
pub const SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    /// No longer returned for every region
    pub id: Option<String>,
    pub puuid: String,
    pub summoner_level: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchDto {
    pub info: MatchInfoDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoDto {
    /// Milliseconds since the epoch
    pub game_creation: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_id: i64,
}

pub fn parse_json<'a, T: Deserialize<'a>>(text: &'a str, data_type: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| parse_context(data_type))
}

/// Solo-queue position out of all league entries, if the player is placed
pub fn solo_queue_rank(entries: &[LeagueEntryDto]) -> Option<RankPoint> {
    let entry = entries.iter().find(|e| e.queue_type == SOLO_QUEUE)?;
    entry_rank(entry)
}

fn entry_rank(entry: &LeagueEntryDto) -> Option<RankPoint> {
    let tier = match entry.tier.parse::<Tier>() {
        Ok(tier) => tier,
        Err(e) => {
            warn!("Skipping league entry: {}", e);
            return None;
        }
    };
    let division = entry
        .rank
        .as_deref()
        .and_then(|rank| rank.parse::<Division>().ok());
    Some(RankPoint::new(tier, division))
}

/// The game as seen by one participant; `None` if they did not play in it
pub fn match_record(details: &MatchDto, puuid: &str) -> Option<MatchRecord> {
    let participant = details.info.participants.iter().find(|p| p.puuid == puuid)?;
    let played_at = DateTime::from_timestamp_millis(details.info.game_creation)?;

    Some(MatchRecord {
        champion_id: participant.champion_id,
        played_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const LEAGUE_ENTRIES: &str = r#"[
        {"leagueId": "a", "queueType": "RANKED_FLEX_SR", "tier": "DIAMOND", "rank": "I", "leaguePoints": 12},
        {"leagueId": "b", "queueType": "RANKED_SOLO_5x5", "tier": "GOLD", "rank": "II", "leaguePoints": 55, "wins": 40, "losses": 38}
    ]"#;

    const MATCH: &str = r#"{
        "metadata": {"matchId": "KR_1"},
        "info": {
            "gameCreation": 1717243200000,
            "queueId": 420,
            "participants": [
                {"puuid": "other", "championId": 1, "kills": 3},
                {"puuid": "me", "championId": 157, "kills": 9}
            ]
        }
    }"#;

    #[test]
    fn test_solo_queue_rank_ignores_flex() {
        let entries: Vec<LeagueEntryDto> = parse_json(LEAGUE_ENTRIES, "league entries").unwrap();
        assert_eq!(
            solo_queue_rank(&entries),
            Some(RankPoint::new(Tier::Gold, Some(Division::Two)))
        );
    }

    #[test]
    fn test_unplaced_player_has_no_rank() {
        let entries: Vec<LeagueEntryDto> = parse_json(
            r#"[{"queueType": "RANKED_FLEX_SR", "tier": "SILVER", "rank": "IV"}]"#,
            "league entries",
        )
        .unwrap();
        assert_eq!(solo_queue_rank(&entries), None);
    }

    #[test]
    fn test_apex_entry_drops_division() {
        let entries: Vec<LeagueEntryDto> = parse_json(
            r#"[{"queueType": "RANKED_SOLO_5x5", "tier": "MASTER", "rank": "I"}]"#,
            "league entries",
        )
        .unwrap();
        assert_eq!(solo_queue_rank(&entries), Some(RankPoint::new(Tier::Master, None)));
    }

    #[test]
    fn test_match_record_for_participant() {
        let details: MatchDto = parse_json(MATCH, "match").unwrap();
        let record = match_record(&details, "me").unwrap();
        assert_eq!(record.champion_id, 157);
        assert_eq!(record.played_at, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        assert!(match_record(&details, "stranger").is_none());
    }

    #[test]
    fn test_summoner_without_id() {
        let summoner: SummonerDto =
            parse_json(r#"{"puuid": "p", "summonerLevel": 312, "profileIconId": 7}"#, "summoner").unwrap();
        assert_eq!(summoner.id, None);
        assert_eq!(summoner.summoner_level, 312);
    }
}
