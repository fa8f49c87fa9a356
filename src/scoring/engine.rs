use serde::{Deserialize, Serialize};

use super::tier::{self, RankPoint};

/// Everything the score is derived from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRankProfile {
    pub current_season: Option<RankPoint>,
    pub all_time_highest: Option<RankPoint>,
    pub account_level: i64,
    /// Negative values are a bonus
    pub mastery_signal: i32,
}

/// Intermediate values of a score computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_rank: RankPoint,
    pub base_score: i32,
    pub level_floor: i32,
    pub mastery_signal: i32,
    pub total: i32,
}

/// Account-level thresholds and the minimum score each guarantees, highest first
const LEVEL_FLOORS: [(i64, i32); 3] = [(300, 13), (200, 9), (100, 6)];

pub fn compute_score(profile: &PlayerRankProfile) -> i32 {
    explain_score(profile).total
}

pub fn explain_score(profile: &PlayerRankProfile) -> ScoreBreakdown {
    let base_rank = base_rank(profile);
    let base_score = base_rank.point_score();
    let level_floor = level_floor(profile.account_level);

    ScoreBreakdown {
        base_rank,
        base_score,
        level_floor,
        mastery_signal: profile.mastery_signal,
        total: base_score.max(level_floor) + profile.mastery_signal,
    }
}

/// Current season blended with the all-time peak; falls back to the peak alone
/// when the player is unranked this season
pub fn base_rank(profile: &PlayerRankProfile) -> RankPoint {
    let peak = profile.all_time_highest.unwrap_or_else(RankPoint::floor);
    match profile.current_season {
        Some(current) => tier::midpoint(current, peak),
        None => peak,
    }
}

pub fn level_floor(account_level: i64) -> i32 {
    LEVEL_FLOORS
        .iter()
        .find(|(threshold, _)| account_level >= *threshold)
        .map(|&(_, floor)| floor)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tier::{Division, Tier};

    fn rank(tier: Tier, division: Option<Division>) -> Option<RankPoint> {
        Some(RankPoint::new(tier, division))
    }

    #[test]
    fn test_blended_score() {
        let profile = PlayerRankProfile {
            current_season: rank(Tier::Gold, Some(Division::Two)),
            all_time_highest: rank(Tier::Platinum, Some(Division::One)),
            account_level: 250,
            mastery_signal: -2,
        };

        let breakdown = explain_score(&profile);
        assert_eq!(breakdown.base_rank, RankPoint::new(Tier::Platinum, Some(Division::Four)));
        assert_eq!(breakdown.base_score, 16);
        assert_eq!(breakdown.level_floor, 9);
        assert_eq!(breakdown.total, 14);
    }

    #[test]
    fn test_compute_score_is_idempotent() {
        let profile = PlayerRankProfile {
            current_season: rank(Tier::Emerald, Some(Division::Three)),
            all_time_highest: rank(Tier::Diamond, Some(Division::Two)),
            account_level: 120,
            mastery_signal: -1,
        };
        assert_eq!(compute_score(&profile), compute_score(&profile));
    }

    #[test]
    fn test_unranked_this_season_uses_peak() {
        let profile = PlayerRankProfile {
            current_season: None,
            all_time_highest: rank(Tier::Master, None),
            account_level: 40,
            mastery_signal: 0,
        };
        assert_eq!(compute_score(&profile), 30);
    }

    #[test]
    fn test_fully_unranked_player() {
        assert_eq!(compute_score(&PlayerRankProfile::default()), 3);
    }

    #[test]
    fn test_missing_peak_floors_the_midpoint() {
        // SILVER I (11) against IRON IV (0) lands on BRONZE III (5)
        let profile = PlayerRankProfile {
            current_season: rank(Tier::Silver, Some(Division::One)),
            ..PlayerRankProfile::default()
        };
        assert_eq!(base_rank(&profile), RankPoint::new(Tier::Bronze, Some(Division::Three)));
        assert_eq!(compute_score(&profile), 5);
    }

    #[test]
    fn test_level_floor_overrides_low_rank() {
        let profile = PlayerRankProfile {
            current_season: rank(Tier::Iron, Some(Division::Two)),
            all_time_highest: rank(Tier::Bronze, Some(Division::One)),
            account_level: 320,
            mastery_signal: -3,
        };
        assert_eq!(compute_score(&profile), 10);
    }

    #[test]
    fn test_level_floor_thresholds() {
        assert_eq!(level_floor(99), 0);
        assert_eq!(level_floor(100), 6);
        assert_eq!(level_floor(199), 6);
        assert_eq!(level_floor(200), 9);
        assert_eq!(level_floor(300), 13);
        assert_eq!(level_floor(1200), 13);
    }
}
