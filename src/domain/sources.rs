//! Outbound collaborators the league consumes.
//!
//! Each lookup returns `Ok(None)` (or an empty value) when the upstream knows
//! nothing about the subject and `Err` when the upstream itself failed.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::future::Future;

use super::models::{PeakRanks, RiotAccount, RiotId, SchoolCredentials, SchoolUser};
use crate::scoring::{MatchRecord, RankPoint};

pub trait SchoolDirectory: Send + Sync {
    fn authenticate(
        &self,
        credentials: &SchoolCredentials,
    ) -> impl Future<Output = Result<Option<SchoolUser>>> + Send;
}

pub trait RiotGateway: Send + Sync {
    fn resolve_account(
        &self,
        riot_id: &RiotId,
    ) -> impl Future<Output = Result<Option<RiotAccount>>> + Send;

    /// Ranked solo-queue position this season
    fn current_rank(&self, puuid: &str) -> impl Future<Output = Result<Option<RankPoint>>> + Send;

    fn account_level(&self, puuid: &str) -> impl Future<Output = Result<Option<i64>>> + Send;

    /// Ranked solo-queue games, newest first, stopping before `since` and after `max_count`
    fn recent_ranked_matches(
        &self,
        puuid: &str,
        since: DateTime<Utc>,
        max_count: usize,
    ) -> impl Future<Output = Result<Vec<MatchRecord>>> + Send;
}

pub trait PeakRankLookup: Send + Sync {
    fn peak_ranks(&self, riot_id: &RiotId) -> impl Future<Output = Result<PeakRanks>> + Send;
}
