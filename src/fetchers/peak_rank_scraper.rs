use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::config::settings::PeakRankSettings;
use crate::domain::{PeakRankLookup, PeakRanks, RiotId};
use crate::errors::fetch_context;
use crate::http::RateLimitedClient;
use crate::scoring::{Division, RankPoint, Tier};

const ROW_SELECTOR: &str = "tr, li";

/// Scraper for peak ranks shown on a stats-site summoner profile
pub struct PeakRankScraper {
    client: RateLimitedClient,
    base_url: String,
    region: String,
    row_selector: Selector,
    season_regex: Regex,
    peak_label_regex: Regex,
    tier_regex: Regex,
}

impl PeakRankScraper {
    pub fn new(settings: &PeakRankSettings) -> Result<Self> {
        let client = RateLimitedClient::new(&settings.http, HeaderMap::new())?;
        let row_selector = Selector::parse(ROW_SELECTOR)
            .map_err(|e| anyhow::anyhow!("Invalid selector {}: {:?}", ROW_SELECTOR, e))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            region: settings.region.clone(),
            row_selector,
            season_regex: Self::compile(r"(?i)\b(S\d{4}(?:\s*S\d)?|Season\s+\d+)\b")?,
            peak_label_regex: Self::compile(r"(?i)\b(peak|top tier|highest)\b")?,
            tier_regex: Self::compile(
                r"(?i)\b(iron|bronze|silver|gold|platinum|emerald|diamond|master|grandmaster|challenger)(?:\s+(iv|iii|ii|i|[1-4]))?\b",
            )?,
        })
    }

    fn compile(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).with_context(|| format!("Failed to compile regex {}", pattern))
    }

    fn profile_url(&self, riot_id: &RiotId) -> String {
        format!(
            "{}/summoners/{}/{}-{}",
            self.base_url,
            self.region,
            urlencoding::encode(&riot_id.game_name),
            urlencoding::encode(&riot_id.tag_line)
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).await.with_context(|| fetch_context(url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let text = response.text().await.context("Failed to extract HTML text")?;
        Ok(Some(text))
    }

    /// Rows labelled with a past season give prior peaks; a row labelled as the
    /// peak without a season label gives the current-season peak
    pub fn parse_peak_ranks(&self, html: &Html) -> PeakRanks {
        let mut ranks = PeakRanks::default();
        let mut seen_seasons = HashSet::new();

        for row in html.select(&self.row_selector) {
            let text = row.text().collect::<Vec<_>>().join(" ");
            let Some(rank) = self.parse_rank(&text) else {
                continue;
            };

            if let Some(season) = self.season_regex.captures(&text).and_then(|c| c.get(1)) {
                let season = season.as_str().to_ascii_uppercase();
                if seen_seasons.insert(season.clone()) {
                    debug!("  Season {} peak {}", season, rank);
                    ranks.prior_season_peaks.push(rank);
                }
            } else if ranks.current_season_peak.is_none() && self.peak_label_regex.is_match(&text) {
                debug!("  Current season peak {}", rank);
                ranks.current_season_peak = Some(rank);
            }
        }

        ranks
    }

    fn parse_rank(&self, text: &str) -> Option<RankPoint> {
        let captures = self.tier_regex.captures(text)?;
        let tier = captures.get(1)?.as_str().parse::<Tier>().ok()?;
        let division = captures
            .get(2)
            .and_then(|d| d.as_str().parse::<Division>().ok());
        Some(RankPoint::new(tier, division))
    }
}

impl PeakRankLookup for PeakRankScraper {
    async fn peak_ranks(&self, riot_id: &RiotId) -> Result<PeakRanks> {
        let url = self.profile_url(riot_id);
        info!("Looking up peak ranks for {}", riot_id.handle());

        let Some(page) = self.fetch_page(&url).await? else {
            warn!("No stats profile for {}", riot_id.handle());
            return Ok(PeakRanks::default());
        };

        let html = Html::parse_document(&page);
        Ok(self.parse_peak_ranks(&html))
    }
}
