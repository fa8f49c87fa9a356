pub mod capacity;
pub mod recruitment;

pub use capacity::{CapacityPolicy, TeamRoster};
pub use recruitment::{RecruitDecision, RecruitStatus};
