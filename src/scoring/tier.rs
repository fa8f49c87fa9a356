use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ParseEnumError;

/// Number of ordinal steps a sub-apex tier spans (one per division)
pub const DIVISIONS_PER_TIER: i32 = 4;

/// Highest ordinal on the scale (CHALLENGER)
pub const MAX_ORDINAL: i32 = Tier::Challenger as i32 * DIVISIONS_PER_TIER + 3;

/// Competitive rank tier, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// MASTER and above have no divisions
    pub fn is_apex(self) -> bool {
        self >= Tier::Master
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }

    fn base(self) -> i32 {
        self as i32 * DIVISIONS_PER_TIER
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == upper)
            .ok_or_else(|| ParseEnumError::new("tier", s))
    }
}

/// Division inside a sub-apex tier, IV is the lowest and I the highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "IV")]
    Four,
    #[serde(rename = "III")]
    Three,
    #[serde(rename = "II")]
    Two,
    #[serde(rename = "I")]
    One,
}

impl Division {
    pub const ALL: [Division; 4] = [Division::Four, Division::Three, Division::Two, Division::One];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Four => "IV",
            Division::Three => "III",
            Division::Two => "II",
            Division::One => "I",
        }
    }

    fn offset(self) -> i32 {
        self as i32
    }

    fn from_offset(offset: i32) -> Division {
        match offset {
            0 => Division::Four,
            1 => Division::Three,
            2 => Division::Two,
            _ => Division::One,
        }
    }

    /// I and II share the upper point bucket; a missing division counts as upper
    fn is_upper_bucket(division: Option<Division>) -> bool {
        matches!(division, None | Some(Division::One | Division::Two))
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = ParseEnumError;

    /// Accepts roman (`II`) and arabic (`2`) notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IV" | "4" => Ok(Division::Four),
            "III" | "3" => Ok(Division::Three),
            "II" | "2" => Ok(Division::Two),
            "I" | "1" => Ok(Division::One),
            _ => Err(ParseEnumError::new("division", s)),
        }
    }
}

/// A position on the rank ladder.
///
/// Apex tiers never carry a division. A sub-apex tier without a division is
/// read as the top division of that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankPoint {
    pub tier: Tier,
    pub division: Option<Division>,
}

impl RankPoint {
    /// Builds a rank point, dropping any division given for an apex tier
    pub fn new(tier: Tier, division: Option<Division>) -> Self {
        let division = if tier.is_apex() { None } else { division };
        Self { tier, division }
    }

    /// Lowest point on the ladder, used for unranked players
    pub fn floor() -> Self {
        Self::new(Tier::Iron, Some(Division::Four))
    }

    pub fn ordinal(&self) -> i32 {
        ordinal(self.tier, self.division)
    }

    pub fn point_score(&self) -> i32 {
        point_score(self.tier, self.division)
    }
}

impl fmt::Display for RankPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.division {
            Some(division) => write!(f, "{} {}", self.tier, division),
            None => write!(f, "{}", self.tier),
        }
    }
}

impl FromStr for RankPoint {
    type Err = ParseEnumError;

    /// Parses `GOLD II`, `gold 2` or `MASTER`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let tier = parts
            .next()
            .ok_or_else(|| ParseEnumError::new("rank", s))?
            .parse::<Tier>()?;
        let division = parts.next().map(str::parse::<Division>).transpose()?;
        Ok(RankPoint::new(tier, division))
    }
}

/// Linear strength value: four steps per tier, apex tiers pinned to their top step
pub fn ordinal(tier: Tier, division: Option<Division>) -> i32 {
    let division = if tier.is_apex() {
        Division::One
    } else {
        division.unwrap_or(Division::One)
    };
    tier.base() + division.offset()
}

/// Inverse of [`ordinal`]; out-of-range values are clamped onto the ladder
pub fn from_ordinal(value: i32) -> RankPoint {
    let value = value.clamp(0, MAX_ORDINAL);
    let tier = Tier::ALL[(value / DIVISIONS_PER_TIER) as usize];
    let division = Division::from_offset(value % DIVISIONS_PER_TIER);
    RankPoint::new(tier, Some(division))
}

pub fn point_score(tier: Tier, division: Option<Division>) -> i32 {
    let upper = Division::is_upper_bucket(division);
    let (high, low) = match tier {
        Tier::Iron => (3, 3),
        Tier::Bronze => (7, 5),
        Tier::Silver => (10, 8),
        Tier::Gold => (14, 12),
        Tier::Platinum => (18, 16),
        Tier::Emerald => (22, 20),
        Tier::Diamond => (25, 25),
        Tier::Master => (30, 30),
        Tier::Grandmaster => (35, 35),
        Tier::Challenger => (40, 40),
    };
    if upper { high } else { low }
}

/// Rank halfway between two points, rounding down on the ordinal scale
pub fn midpoint(a: RankPoint, b: RankPoint) -> RankPoint {
    from_ordinal((a.ordinal() + b.ordinal()) / 2)
}

/// Strongest of the given points by ordinal; ties keep the first seen
pub fn highest<I>(points: I) -> Option<RankPoint>
where
    I: IntoIterator<Item = RankPoint>,
{
    points.into_iter().fold(None, |best, point| match best {
        Some(current) if current.ordinal() >= point.ordinal() => Some(current),
        _ => Some(point),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_points() -> Vec<RankPoint> {
        let mut points = Vec::new();
        for tier in Tier::ALL {
            if tier.is_apex() {
                points.push(RankPoint::new(tier, None));
            } else {
                for division in Division::ALL {
                    points.push(RankPoint::new(tier, Some(division)));
                }
            }
        }
        points
    }

    #[test]
    fn test_ordinal_round_trip() {
        for point in all_points() {
            assert_eq!(from_ordinal(point.ordinal()), point, "round trip of {point}");
        }
    }

    #[test]
    fn test_apex_division_is_coerced() {
        let master = RankPoint::new(Tier::Master, Some(Division::Four));
        assert_eq!(master.division, None);
        assert_eq!(ordinal(Tier::Master, Some(Division::Four)), ordinal(Tier::Master, None));
        assert_eq!(ordinal(Tier::Master, None), 31);
        assert_eq!(ordinal(Tier::Challenger, None), MAX_ORDINAL);
    }

    #[test]
    fn test_missing_division_reads_as_top_division() {
        assert_eq!(ordinal(Tier::Gold, None), ordinal(Tier::Gold, Some(Division::One)));
        assert_eq!(point_score(Tier::Emerald, None), 22);
        assert_eq!(point_score(Tier::Emerald, Some(Division::Three)), 20);
    }

    #[test]
    fn test_point_score_is_monotonic() {
        let points = all_points();
        for pair in points.windows(2) {
            assert!(
                pair[0].point_score() <= pair[1].point_score(),
                "{} scored above {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_apex_point_scores() {
        assert_eq!(point_score(Tier::Diamond, Some(Division::Four)), 25);
        assert_eq!(point_score(Tier::Master, None), 30);
        assert_eq!(point_score(Tier::Grandmaster, None), 35);
        assert_eq!(point_score(Tier::Challenger, None), 40);
        assert_eq!(point_score(Tier::Iron, Some(Division::One)), 3);
    }

    #[test]
    fn test_from_ordinal_clamps() {
        assert_eq!(from_ordinal(-7), RankPoint::floor());
        assert_eq!(from_ordinal(500), RankPoint::new(Tier::Challenger, None));
        assert_eq!(from_ordinal(29), RankPoint::new(Tier::Master, None));
    }

    #[test]
    fn test_midpoint() {
        let gold_two = RankPoint::new(Tier::Gold, Some(Division::Two));
        let plat_one = RankPoint::new(Tier::Platinum, Some(Division::One));
        let mid = midpoint(gold_two, plat_one);
        assert_eq!(mid, RankPoint::new(Tier::Platinum, Some(Division::Four)));
        assert_eq!(mid.point_score(), 16);

        // 27 + 31 = 58, halved to 29
        let diamond_one = RankPoint::new(Tier::Diamond, Some(Division::One));
        let master = RankPoint::new(Tier::Master, None);
        assert_eq!(midpoint(diamond_one, master), master);
    }

    #[test]
    fn test_highest() {
        let silver = RankPoint::new(Tier::Silver, Some(Division::One));
        let gold = RankPoint::new(Tier::Gold, Some(Division::Four));
        assert_eq!(highest([silver, gold, silver]), Some(gold));
        assert_eq!(highest(Vec::<RankPoint>::new()), None);
    }

    #[test]
    fn test_parse_rank_point() {
        assert_eq!(
            "gold 2".parse::<RankPoint>().unwrap(),
            RankPoint::new(Tier::Gold, Some(Division::Two))
        );
        assert_eq!(
            "GRANDMASTER".parse::<RankPoint>().unwrap(),
            RankPoint::new(Tier::Grandmaster, None)
        );
        assert!("WOOD IV".parse::<RankPoint>().is_err());
        assert!("GOLD V".parse::<RankPoint>().is_err());
    }
}
