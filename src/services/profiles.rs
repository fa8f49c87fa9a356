use anyhow::{Context, Result};
use log::warn;

use crate::config::settings::ScoringSettings;
use crate::domain::{PeakRankLookup, PeakRanks, RiotGateway, RiotId};
use crate::scoring::tier::highest;
use crate::scoring::{mastery_signal, PlayerRankProfile, RankPoint};

/// Rank inputs fetched from upstream for one player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankSnapshot {
    pub current_rank: Option<RankPoint>,
    pub peaks: PeakRanks,
    pub mastery_signal: i32,
}

impl RankSnapshot {
    /// Strongest of the stored all-time value, every fetched peak and the current rank
    pub fn all_time_highest(&self, stored: Option<RankPoint>) -> Option<RankPoint> {
        highest(
            stored
                .into_iter()
                .chain(self.peaks.all())
                .chain(self.current_rank),
        )
    }

    /// Replaces the rank inputs of `profile`, keeping its account level
    pub fn apply_to(&self, profile: &PlayerRankProfile) -> PlayerRankProfile {
        PlayerRankProfile {
            current_season: self.current_rank,
            all_time_highest: self.all_time_highest(profile.all_time_highest),
            account_level: profile.account_level,
            mastery_signal: self.mastery_signal,
        }
    }
}

/// Fetches current rank, peaks and mastery signal.
///
/// Only a failed current-rank lookup is an error. Peak lookup failures leave the
/// peaks empty and match history failures give a mastery signal of 0.
pub async fn fetch_rank_snapshot<R, P>(
    riot: &R,
    peak_lookup: &P,
    scoring: &ScoringSettings,
    riot_id: Option<&RiotId>,
    puuid: &str,
) -> Result<RankSnapshot>
where
    R: RiotGateway,
    P: PeakRankLookup,
{
    let current_rank = riot
        .current_rank(puuid)
        .await
        .context("Failed to fetch current rank")?;

    let peaks = match riot_id {
        Some(riot_id) => peak_lookup.peak_ranks(riot_id).await.unwrap_or_else(|e| {
            warn!("Peak rank lookup failed for {}: {:?}", riot_id.handle(), e);
            PeakRanks::default()
        }),
        None => PeakRanks::default(),
    };

    let mastery_signal = match riot
        .recent_ranked_matches(puuid, scoring.season_start, scoring.mastery_sample_size)
        .await
    {
        Ok(matches) => mastery_signal(&matches, scoring),
        Err(e) => {
            warn!("Match history unavailable for {}, mastery signal set to 0: {:?}", puuid, e);
            0
        }
    };

    Ok(RankSnapshot {
        current_rank,
        peaks,
        mastery_signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Division, MatchRecord, Tier};
    use crate::test_support::{FakePeaks, FakeRiot, FakeSummoner};
    use chrono::{Duration, Utc};

    fn gold_two() -> RankPoint {
        RankPoint::new(Tier::Gold, Some(Division::Two))
    }

    fn one_trick() -> Vec<MatchRecord> {
        let now = Utc::now();
        (0..10)
            .map(|i| MatchRecord {
                champion_id: 99,
                played_at: now - Duration::hours(i),
            })
            .collect()
    }

    fn riot() -> FakeRiot {
        FakeRiot::default().with_summoner(
            "kim#KR1",
            FakeSummoner {
                puuid: "p1".to_string(),
                level: 150,
                rank: Some(gold_two()),
                matches: one_trick(),
            },
        )
    }

    #[tokio::test]
    async fn test_snapshot_combines_sources() {
        let peaks = FakePeaks::default().with_peaks(
            "kim#KR1",
            PeakRanks {
                current_season_peak: Some(RankPoint::new(Tier::Platinum, Some(Division::Three))),
                prior_season_peaks: vec![RankPoint::new(Tier::Emerald, Some(Division::Four))],
            },
        );
        let riot_id = RiotId::new("kim", "KR1");

        let snapshot = fetch_rank_snapshot(&riot(), &peaks, &ScoringSettings::default(), Some(&riot_id), "p1")
            .await
            .unwrap();

        assert_eq!(snapshot.current_rank, Some(gold_two()));
        assert_eq!(snapshot.mastery_signal, -4);
        assert_eq!(
            snapshot.all_time_highest(None),
            Some(RankPoint::new(Tier::Emerald, Some(Division::Four)))
        );
        let diamond = RankPoint::new(Tier::Diamond, Some(Division::Two));
        assert_eq!(snapshot.all_time_highest(Some(diamond)), Some(diamond));
    }

    #[tokio::test]
    async fn test_secondary_sources_degrade() {
        let mut riot = riot();
        riot.failing_matches = true;
        let peaks = FakePeaks {
            unavailable: true,
            ..FakePeaks::default()
        };
        let riot_id = RiotId::new("kim", "KR1");

        let snapshot = fetch_rank_snapshot(&riot, &peaks, &ScoringSettings::default(), Some(&riot_id), "p1")
            .await
            .unwrap();

        assert_eq!(snapshot.mastery_signal, 0);
        assert_eq!(snapshot.peaks, PeakRanks::default());
        assert_eq!(snapshot.all_time_highest(None), Some(gold_two()));
    }

    #[tokio::test]
    async fn test_current_rank_failure_is_an_error() {
        let mut riot = riot();
        riot.failing_ranks.insert("p1".to_string());

        let result =
            fetch_rank_snapshot(&riot, &FakePeaks::default(), &ScoringSettings::default(), None, "p1").await;
        assert!(result.is_err());
    }
}
