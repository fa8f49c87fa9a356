use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::api::parsers::riot::{self, AccountDto, LeagueEntryDto, MatchDto, SummonerDto};
use crate::config::settings::RiotSettings;
use crate::domain::{RiotAccount, RiotGateway, RiotId};
use crate::errors::fetch_context;
use crate::http::RateLimitedClient;
use crate::scoring::{MatchRecord, RankPoint};

const RANKED_SOLO_QUEUE_ID: u32 = 420;
/// Largest page match-v5 serves
const MAX_MATCH_IDS: usize = 100;

/// Riot Games API client
pub struct RiotClient {
    client: RateLimitedClient,
    platform_base_url: String,
    regional_base_url: String,
}

impl RiotClient {
    pub fn new(settings: &RiotSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&settings.api_key).context("Invalid Riot API key")?;
        headers.insert("X-Riot-Token", token);

        let client = RateLimitedClient::new(&settings.http, headers)?;
        Ok(Self {
            client,
            platform_base_url: settings.platform_base_url.trim_end_matches('/').to_string(),
            regional_base_url: settings.regional_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET and decode; a 404 means the subject does not exist
    async fn get_json<T: DeserializeOwned>(&self, url: &str, data_type: &str) -> Result<Option<T>> {
        let response = self.client.get(url).await.with_context(|| fetch_context(url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("Riot API returned status {} for {}", response.status(), url);
        }

        let text = response.text().await.with_context(|| fetch_context(url))?;
        riot::parse_json::<T>(&text, data_type).map(Some)
    }

    async fn summoner(&self, puuid: &str) -> Result<Option<SummonerDto>> {
        let url = format!(
            "{}/lol/summoner/v4/summoners/by-puuid/{}",
            self.platform_base_url,
            encode(puuid)
        );
        self.get_json(&url, "summoner").await
    }

    async fn match_ids(&self, puuid: &str, since: DateTime<Utc>, count: usize) -> Result<Vec<String>> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?queue={}&start=0&count={}&startTime={}",
            self.regional_base_url,
            encode(puuid),
            RANKED_SOLO_QUEUE_ID,
            count.min(MAX_MATCH_IDS),
            since.timestamp()
        );
        Ok(self.get_json(&url, "match ids").await?.unwrap_or_default())
    }

    async fn match_details(&self, match_id: &str) -> Result<Option<MatchDto>> {
        let url = format!(
            "{}/lol/match/v5/matches/{}",
            self.regional_base_url,
            encode(match_id)
        );
        self.get_json(&url, "match").await
    }
}

impl RiotGateway for RiotClient {
    async fn resolve_account(&self, riot_id: &RiotId) -> Result<Option<RiotAccount>> {
        let url = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.regional_base_url,
            encode(&riot_id.game_name),
            encode(&riot_id.tag_line)
        );
        let Some(account) = self.get_json::<AccountDto>(&url, "account").await? else {
            return Ok(None);
        };

        let summoner = self.summoner(&account.puuid).await?;
        info!("Resolved Riot ID {}", riot_id.handle());
        Ok(Some(RiotAccount {
            puuid: account.puuid,
            summoner_id: summoner.and_then(|s| s.id),
        }))
    }

    async fn current_rank(&self, puuid: &str) -> Result<Option<RankPoint>> {
        let url = format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            self.platform_base_url,
            encode(puuid)
        );
        let entries: Vec<LeagueEntryDto> = self.get_json(&url, "league entries").await?.unwrap_or_default();
        Ok(riot::solo_queue_rank(&entries))
    }

    async fn account_level(&self, puuid: &str) -> Result<Option<i64>> {
        let summoner = self.summoner(puuid).await?;
        Ok(summoner.map(|s| s.summoner_level))
    }

    async fn recent_ranked_matches(
        &self,
        puuid: &str,
        since: DateTime<Utc>,
        max_count: usize,
    ) -> Result<Vec<MatchRecord>> {
        let ids = self.match_ids(puuid, since, max_count).await?;
        let mut records = Vec::new();

        for match_id in ids {
            let Some(details) = self.match_details(&match_id).await? else {
                continue;
            };
            let Some(record) = riot::match_record(&details, puuid) else {
                continue;
            };
            if record.played_at < since {
                break;
            }
            records.push(record);
            if records.len() >= max_count {
                break;
            }
        }

        debug!("Fetched {} ranked games for {}", records.len(), puuid);
        Ok(records)
    }
}
