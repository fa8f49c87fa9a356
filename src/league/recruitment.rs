use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::ParseEnumError;
use crate::errors::{LeagueError, LeagueResult};

/// Lifecycle of a recruit request: PENDING, then ACCEPTED or REJECTED for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecruitStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecruitDecision {
    Accept,
    Reject,
}

impl RecruitDecision {
    pub fn from_accept(accept: bool) -> Self {
        if accept {
            RecruitDecision::Accept
        } else {
            RecruitDecision::Reject
        }
    }
}

impl RecruitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecruitStatus::Pending => "PENDING",
            RecruitStatus::Accepted => "ACCEPTED",
            RecruitStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecruitStatus::Pending)
    }

    /// Next status for a response; only PENDING requests can be answered
    pub fn resolve(self, decision: RecruitDecision) -> LeagueResult<RecruitStatus> {
        if self.is_terminal() {
            return Err(LeagueError::Conflict(
                "This recruit request has already been answered".to_string(),
            ));
        }
        Ok(match decision {
            RecruitDecision::Accept => RecruitStatus::Accepted,
            RecruitDecision::Reject => RecruitStatus::Rejected,
        })
    }
}

impl FromStr for RecruitStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(RecruitStatus::Pending),
            "ACCEPTED" => Ok(RecruitStatus::Accepted),
            "REJECTED" => Ok(RecruitStatus::Rejected),
            _ => Err(ParseEnumError::new("recruit status", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_resolves() {
        assert_eq!(
            RecruitStatus::Pending.resolve(RecruitDecision::Accept).unwrap(),
            RecruitStatus::Accepted
        );
        assert_eq!(
            RecruitStatus::Pending.resolve(RecruitDecision::from_accept(false)).unwrap(),
            RecruitStatus::Rejected
        );
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        for status in [RecruitStatus::Accepted, RecruitStatus::Rejected] {
            assert!(status.is_terminal());
            for decision in [RecruitDecision::Accept, RecruitDecision::Reject] {
                assert!(matches!(status.resolve(decision), Err(LeagueError::Conflict(_))));
            }
        }
    }

    #[test]
    fn test_status_text_round_trip() {
        for status in [RecruitStatus::Pending, RecruitStatus::Accepted, RecruitStatus::Rejected] {
            assert_eq!(status.as_str().parse::<RecruitStatus>().unwrap(), status);
        }
    }
}
