use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;
use crate::scoring::RankPoint;

/// School membership category reported by the SSO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Sch,
    Stu,
    Dor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Sch => "SCH",
            UserRole::Stu => "STU",
            UserRole::Dor => "DOR",
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCH" => Ok(UserRole::Sch),
            "STU" => Ok(UserRole::Stu),
            "DOR" => Ok(UserRole::Dor),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lane {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Top => "TOP",
            Lane::Jungle => "JUNGLE",
            Lane::Mid => "MID",
            Lane::Adc => "ADC",
            Lane::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Lane::Top),
            "JUNGLE" => Ok(Lane::Jungle),
            "MID" => Ok(Lane::Mid),
            "ADC" => Ok(Lane::Adc),
            "SUPPORT" => Ok(Lane::Support),
            _ => Err(ParseEnumError::new("lane", s)),
        }
    }
}

/// Login payload forwarded to the school SSO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolCredentials {
    pub account_id: String,
    pub password: String,
}

/// Student record returned by the school SSO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolUser {
    pub account_id: String,
    pub name: String,
    pub grade: i32,
    pub class_num: i32,
    pub num: i32,
    #[serde(rename = "user_role")]
    pub role: UserRole,
}

/// Riot account resolved from a Riot ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotAccount {
    pub puuid: String,
    pub summoner_id: Option<String>,
}

/// Riot ID as typed by the player, `gameName#tagLine`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    pub fn new(game_name: &str, tag_line: &str) -> Self {
        Self {
            game_name: game_name.trim().to_string(),
            tag_line: tag_line.trim().trim_start_matches('#').to_string(),
        }
    }

    pub fn parse(handle: &str) -> Option<Self> {
        let (game_name, tag_line) = handle.rsplit_once('#')?;
        if game_name.trim().is_empty() || tag_line.trim().is_empty() {
            return None;
        }
        Some(Self::new(game_name, tag_line))
    }

    pub fn handle(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

/// Peak ranks reported by the stats site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakRanks {
    pub current_season_peak: Option<RankPoint>,
    pub prior_season_peaks: Vec<RankPoint>,
}

impl PeakRanks {
    pub fn all(&self) -> impl Iterator<Item = RankPoint> + '_ {
        self.current_season_peak
            .iter()
            .chain(self.prior_season_peaks.iter())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riot_id_handle() {
        let id = RiotId::parse("Hide on bush#KR1").unwrap();
        assert_eq!(id.game_name, "Hide on bush");
        assert_eq!(id.tag_line, "KR1");
        assert_eq!(id.handle(), "Hide on bush#KR1");

        assert_eq!(RiotId::new(" faker ", "#kr").handle(), "faker#kr");
        assert!(RiotId::parse("no-tag").is_none());
        assert!(RiotId::parse("#KR1").is_none());
    }

    #[test]
    fn test_school_user_from_sso_payload() {
        let json = r#"{
            "id": "7f1c",
            "account_id": "student01",
            "password": "ignored",
            "name": "Kim",
            "grade": 2,
            "class_num": 3,
            "num": 14,
            "user_role": "STU"
        }"#;
        let user: SchoolUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.account_id, "student01");
        assert_eq!(user.role, UserRole::Stu);
        assert_eq!(user.class_num, 3);
    }

    #[test]
    fn test_parse_lane() {
        assert_eq!("adc".parse::<Lane>().unwrap(), Lane::Adc);
        assert!("bot".parse::<Lane>().is_err());
    }
}
