pub mod accounts;
pub mod profiles;
pub mod recruitment;
pub mod server;
pub mod sweeps;
pub mod teams;

pub use accounts::{AccountService, LinkRequest, PlayerEntry};
pub use recruitment::{RecruitEntry, RecruitResolution, RecruitService};
pub use server::ServerService;
pub use sweeps::{SweepReport, SweepService};
pub use teams::{LeaveOutcome, TeamDetails, TeamService};
