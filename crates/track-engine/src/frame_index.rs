//! Dense frame indexing from timestamps

use crate::TrackFrame;
use motion_log::{OptionalColumns, TrackPoint};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Timestamp as an ordering key; `-0.0` folds into `0.0`
fn timestamp_key(timestamp: Option<f64>) -> Option<f64> {
    timestamp.map(|t| t + 0.0)
}

/// Rows without a timestamp sort before every timestamped row
fn cmp_keys(a: &Option<f64>, b: &Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(b),
    }
}

/// Rank of each timestamp among the distinct timestamps (0-based).
///
/// Identical timestamps always share a frame id.
pub fn derive_frame_ids<I>(timestamps: I) -> Vec<i64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let keys: Vec<Option<f64>> = timestamps.into_iter().map(timestamp_key).collect();

    let mut distinct = keys.clone();
    distinct.sort_by(cmp_keys);
    distinct.dedup_by(|a, b| cmp_keys(a, b) == Ordering::Equal);

    keys.iter()
        .map(|key| {
            distinct
                .binary_search_by(|candidate| cmp_keys(candidate, key))
                .unwrap_or_else(|pos| pos) as i64
        })
        .collect()
}

/// Frame id for every row of one scenario, in row order.
///
/// Pre-computed ids are passed through unmodified when the column is present
/// and filled on every row; otherwise ids are derived from timestamp ranks.
/// A single empty `frame_id` cell discards every given id in the scenario,
/// valid ones included, and all rows are re-derived from timestamps.
pub fn assign_frame_ids(points: &[TrackPoint], columns: &OptionalColumns) -> Vec<i64> {
    if columns.frame_id {
        let given: Option<Vec<i64>> = points.iter().map(|p| p.frame_id).collect();
        match given {
            Some(ids) => return ids,
            None => warn!("frame_id column has empty cells; deriving ids from timestamps"),
        }
    }

    if !columns.timestamp {
        debug!("No timestamp column; all {} rows share frame 0", points.len());
    }

    derive_frame_ids(points.iter().map(|p| p.timestamp))
}

/// Sorted distinct frame ids present in a set of frames
pub fn distinct_frame_ids(frames: &[TrackFrame]) -> Vec<i64> {
    let mut ids: Vec<i64> = frames.iter().map(|f| f.frame_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
