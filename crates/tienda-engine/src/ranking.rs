//! Monthly leaderboard over the points records.
//!
//! The ranking recomputes each account's live sum on its own; it never
//! trusts a stored `total`, since records are only pruned when the ledger
//! touches them.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tienda_core::{PointsAccount, UserId};

/// Default number of leaderboard places.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// One leaderboard place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    /// The ranked account.
    pub user: UserId,

    /// Points earned inside the window.
    pub points: i64,
}

/// Rank accounts by points earned inside the window, descending.
///
/// Accounts with no positive sum are excluded; ties keep the snapshot
/// order. An empty result is a normal outcome, not an error.
#[must_use]
pub fn monthly_ranking(
    accounts: &[(UserId, PointsAccount)],
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
) -> Vec<RankEntry> {
    let mut ranking: Vec<RankEntry> = accounts
        .iter()
        .filter_map(|(user, account)| {
            let points = account.live_points(now, window);
            (points > 0).then(|| RankEntry {
                user: user.clone(),
                points,
            })
        })
        .collect();

    ranking.sort_by_key(|entry| Reverse(entry.points));
    ranking.truncate(limit);
    ranking
}
