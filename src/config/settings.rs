use chrono::{DateTime, Utc};
use log::warn;
use std::str::FromStr;

use crate::league::CapacityPolicy;
use crate::scoring::PairRule;

#[derive(Debug, Clone)]
pub struct ScoringSettings {
    /// Games played before this instant belong to an earlier season
    pub season_start: DateTime<Utc>,
    pub mastery_sample_size: usize,
    pub mastery_pair_rule: PairRule,
    pub min_account_level: i64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            season_start: DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default(), // 2024-01-01
            mastery_sample_size: 50,
            mastery_pair_rule: PairRule::CombinedShare,
            min_account_level: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeagueSettings {
    pub max_members: usize,
    pub max_total_score: i64,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            max_members: 5,
            max_total_score: 50,
        }
    }
}

impl LeagueSettings {
    pub fn capacity_policy(&self) -> CapacityPolicy {
        CapacityPolicy::new(self.max_members, self.max_total_score)
    }
}

/// Connection parameters shared by every outbound client
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub rate_limit_ms: u64,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RiotSettings {
    pub api_key: String,
    pub platform_base_url: String,
    pub regional_base_url: String,
    pub http: HttpSettings,
}

impl Default for RiotSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            platform_base_url: "https://kr.api.riotgames.com".to_string(),
            regional_base_url: "https://asia.api.riotgames.com".to_string(),
            http: HttpSettings {
                user_agent: "SchoolLeague/1.0".to_string(),
                rate_limit_ms: 70, // ~15 req/sec
                timeout_secs: 60,
                connect_timeout_secs: 30,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchoolSettings {
    pub base_url: String,
    pub http: HttpSettings,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            http: HttpSettings {
                user_agent: "SchoolLeague/1.0".to_string(),
                rate_limit_ms: 0,
                timeout_secs: 10,
                connect_timeout_secs: 5,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PeakRankSettings {
    pub base_url: String,
    pub region: String,
    pub http: HttpSettings,
}

impl Default for PeakRankSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.op.gg".to_string(),
            region: "kr".to_string(),
            http: HttpSettings {
                user_agent: "Mozilla/5.0 (compatible; SchoolLeague/1.0)".to_string(),
                rate_limit_ms: 1000,
                timeout_secs: 30,
                connect_timeout_secs: 10,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_path: String,
    pub admin_token: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: "school_league.db".to_string(),
            admin_token: "secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub league: LeagueSettings,
    pub riot: RiotSettings,
    pub school: SchoolSettings,
    pub peak_rank: PeakRankSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with whatever the environment provides
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.server.database_path = path;
        }
        if let Some(token) = lookup("ADMIN_TOKEN") {
            config.server.admin_token = token;
        }
        if let Some(key) = lookup("RIOT_API_KEY") {
            config.riot.api_key = key;
        }
        if let Some(url) = lookup("RIOT_PLATFORM_URL") {
            config.riot.platform_base_url = url;
        }
        if let Some(url) = lookup("RIOT_REGIONAL_URL") {
            config.riot.regional_base_url = url;
        }
        if let Some(url) = lookup("SCHOOL_SSO_URL") {
            config.school.base_url = url;
        }
        if let Some(url) = lookup("PEAK_RANK_URL") {
            config.peak_rank.base_url = url;
        }
        if let Some(start) = parse_or_warn::<DateTime<Utc>>(&lookup, "SEASON_START") {
            config.scoring.season_start = start;
        }
        if let Some(rule) = parse_or_warn::<PairRule>(&lookup, "MASTERY_PAIR_RULE") {
            config.scoring.mastery_pair_rule = rule;
        }

        config
    }
}

fn parse_or_warn<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
