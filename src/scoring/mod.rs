pub mod engine;
pub mod mastery;
pub mod tier;

pub use engine::{compute_score, explain_score, PlayerRankProfile, ScoreBreakdown};
pub use mastery::{mastery_signal, MatchRecord, PairRule};
pub use tier::{Division, RankPoint, Tier};
