use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::settings::ScoringSettings;
use crate::domain::ParseEnumError;

/// One ranked solo-queue game played by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub champion_id: i64,
    pub played_at: DateTime<Utc>,
}

/// How the two most-played champions are judged together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairRule {
    /// Shares of the top two champions summed: >= 90% gives -2, >= 80% gives -1
    CombinedShare,
    /// Each of the top two on its own: >= 45% gives -2, >= 40% gives -1
    IndividualShare,
}

impl FromStr for PairRule {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" | "combined_share" => Ok(PairRule::CombinedShare),
            "individual" | "individual_share" => Ok(PairRule::IndividualShare),
            _ => Err(ParseEnumError::new("pair rule", s)),
        }
    }
}

/// Play counts of the two most-played champions over the sampled games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChampionShares {
    pub games: usize,
    pub first_plays: usize,
    pub second_plays: usize,
}

impl ChampionShares {
    pub fn first(&self) -> f64 {
        self.share(self.first_plays)
    }

    pub fn second(&self) -> f64 {
        self.share(self.second_plays)
    }

    /// Summed from counts so that e.g. 6 + 3 of 10 is exactly 0.9
    pub fn combined(&self) -> f64 {
        self.share(self.first_plays + self.second_plays)
    }

    fn share(&self, plays: usize) -> f64 {
        plays as f64 / self.games as f64
    }
}

/// Champion-pool specialisation bonus from a newest-first match history.
///
/// Scanning stops at the first game played before the season start, and at most
/// `mastery_sample_size` games are counted. Returns 0 when nothing qualifies.
pub fn mastery_signal(matches: &[MatchRecord], settings: &ScoringSettings) -> i32 {
    match champion_shares(matches, settings) {
        Some(shares) => {
            let signal = classify(&shares, settings.mastery_pair_rule);
            debug!(
                "Mastery signal {} from {} games (top {:.0}%, second {:.0}%)",
                signal,
                shares.games,
                shares.first() * 100.0,
                shares.second() * 100.0
            );
            signal
        }
        None => 0,
    }
}

pub fn champion_shares(matches: &[MatchRecord], settings: &ScoringSettings) -> Option<ChampionShares> {
    let counts = count_plays(matches, settings);
    let games: usize = counts.values().sum();
    if games == 0 {
        return None;
    }

    let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let plays = |idx: usize| ranked.get(idx).map(|&(_, plays)| plays).unwrap_or(0);

    Some(ChampionShares {
        games,
        first_plays: plays(0),
        second_plays: plays(1),
    })
}

fn count_plays(matches: &[MatchRecord], settings: &ScoringSettings) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    let mut sampled = 0;

    for record in matches {
        if record.played_at < settings.season_start || sampled >= settings.mastery_sample_size {
            break;
        }
        *counts.entry(record.champion_id).or_insert(0) += 1;
        sampled += 1;
    }

    counts
}

pub fn classify(shares: &ChampionShares, rule: PairRule) -> i32 {
    let (first, second) = (shares.first(), shares.second());
    if first >= 0.9 {
        return -4;
    }
    if first >= 0.8 {
        return -3;
    }

    match rule {
        PairRule::CombinedShare => {
            let combined = shares.combined();
            if combined >= 0.9 {
                -2
            } else if combined >= 0.8 {
                -1
            } else {
                0
            }
        }
        PairRule::IndividualShare => {
            if first >= 0.45 && second >= 0.45 {
                -2
            } else if first >= 0.4 && second >= 0.4 {
                -1
            } else {
                0
            }
        }
    }
}
