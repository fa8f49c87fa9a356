use serde::Serialize;

use crate::errors::{LeagueError, LeagueResult};

/// Current size and strength of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TeamRoster {
    pub member_count: usize,
    pub total_score: i64,
}

impl TeamRoster {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        scores.into_iter().fold(Self::default(), |roster, score| Self {
            member_count: roster.member_count + 1,
            total_score: roster.total_score + i64::from(score),
        })
    }
}

/// Roster-size and summed-score ceilings a team must stay within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    pub max_members: usize,
    pub max_total_score: i64,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::new(5, 50)
    }
}

impl CapacityPolicy {
    pub fn new(max_members: usize, max_total_score: i64) -> Self {
        Self {
            max_members,
            max_total_score,
        }
    }

    pub fn has_open_slot(&self, roster: &TeamRoster) -> bool {
        roster.member_count < self.max_members
    }

    pub fn can_admit(&self, roster: &TeamRoster, candidate_score: i32) -> bool {
        self.has_open_slot(roster)
            && roster.total_score + i64::from(candidate_score) <= self.max_total_score
    }

    pub fn ensure_open_slot(&self, roster: &TeamRoster) -> LeagueResult<()> {
        if self.has_open_slot(roster) {
            return Ok(());
        }
        Err(LeagueError::CapacityExceeded(format!(
            "The team is full ({} of {} members)",
            roster.member_count, self.max_members
        )))
    }

    /// Same check as [`can_admit`](Self::can_admit), failing with the numbers involved
    pub fn ensure_admissible(&self, roster: &TeamRoster, candidate_score: i32) -> LeagueResult<()> {
        self.ensure_open_slot(roster)?;
        if self.can_admit(roster, candidate_score) {
            return Ok(());
        }
        Err(LeagueError::CapacityExceeded(format!(
            "Team score limit exceeded (max {}). Current team score: {}, candidate score: {}",
            self.max_total_score, roster.total_score, candidate_score
        )))
    }
}
