//! Snapshots and the named metric rendered from them.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::AccountConfig;
use crate::fetcher::FetchResult;
use crate::tracker::PeriodIncrease;

/// Icon hint for hosts that render the metric.
pub const METRIC_ICON: &str = "mdi:account-group";

/// Result of one successful polling cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Tracked id the snapshot belongs to.
    pub id: String,
    pub follower: u64,
    pub following: u64,
    pub mid: u64,
    pub monthly_increase: i64,
    pub yearly_increase: i64,
    pub month_start_follower: u64,
    pub year_start_follower: u64,
    /// Wall-clock time of the poll, in the tracker's calendar.
    pub observed_at: NaiveDateTime,
}

impl MetricSnapshot {
    pub fn new(
        id: impl Into<String>,
        stat: &FetchResult,
        increase: &PeriodIncrease,
        observed_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            follower: increase.follower,
            following: stat.following,
            mid: stat.mid,
            monthly_increase: increase.monthly_increase,
            yearly_increase: increase.yearly_increase,
            month_start_follower: increase.month_start_counter,
            year_start_follower: increase.year_start_counter,
            observed_at,
        }
    }

    /// Attributes exposed alongside the follower count.
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("following".to_string(), json!(self.following)),
            ("mid".to_string(), json!(self.mid)),
            ("monthly_increase".to_string(), json!(self.monthly_increase)),
            ("yearly_increase".to_string(), json!(self.yearly_increase)),
            (
                "month_start_follower".to_string(),
                json!(self.month_start_follower),
            ),
            (
                "year_start_follower".to_string(),
                json!(self.year_start_follower),
            ),
        ])
    }
}

/// The follower count as a named value with attributes.
///
/// `state` is `None` and `available` is false until the first successful
/// poll. After that the metric keeps showing the last good snapshot even if
/// later polls fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FansMetric {
    pub name: String,
    pub unique_id: String,
    pub icon: &'static str,
    pub state: Option<u64>,
    pub available: bool,
    pub attributes: BTreeMap<String, Value>,
}

impl FansMetric {
    pub fn render(account: &AccountConfig, snapshot: Option<&MetricSnapshot>) -> Self {
        Self {
            name: account.display_name(),
            unique_id: account.unique_id(),
            icon: METRIC_ICON,
            state: snapshot.map(|s| s.follower),
            available: snapshot.is_some(),
            attributes: snapshot.map(MetricSnapshot::attributes).unwrap_or_default(),
        }
    }
}
