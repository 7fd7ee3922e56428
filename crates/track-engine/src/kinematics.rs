//! Speed derivation from velocity components

use motion_log::{OptionalColumns, TrackPoint};
use std::collections::HashMap;

/// m/s → km/h
pub const MPS_TO_KMH: f64 = 3.6;

/// Scalar speed in km/h; 0 unless both components are known
pub fn speed_kmh(vx: Option<f64>, vy: Option<f64>) -> f64 {
    match (vx, vy) {
        (Some(vx), Some(vy)) => MPS_TO_KMH * vx.hypot(vy),
        _ => 0.0,
    }
}

/// Speed for every row, in row order
pub fn annotate_speeds(points: &[TrackPoint], columns: &OptionalColumns) -> Vec<f64> {
    if !columns.velocity {
        return vec![0.0; points.len()];
    }
    points.iter().map(|p| speed_kmh(p.vx, p.vy)).collect()
}

/// Finite-difference velocity for producers whose source has none.
///
/// Each track is walked in timestamp order. The first observation gets
/// `(0, 0)`; later ones get displacement over elapsed time since the previous
/// observation of the same track, or `(0, 0)` when elapsed time is not
/// positive. Rows that already carry both components are left as they are.
pub fn fill_missing_velocity(points: &mut [TrackPoint]) {
    let mut tracks: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (idx, p) in points.iter().enumerate() {
        tracks
            .entry((p.scenario_id.as_str(), p.track_id.as_str()))
            .or_default()
            .push(idx);
    }

    let mut updates: Vec<(usize, f64, f64)> = Vec::new();
    for mut indices in tracks.into_values() {
        indices.sort_by(|&a, &b| {
            let ta = points[a].timestamp.unwrap_or(f64::NAN);
            let tb = points[b].timestamp.unwrap_or(f64::NAN);
            ta.total_cmp(&tb)
        });

        let mut prev: Option<&TrackPoint> = None;
        for &idx in &indices {
            let current = &points[idx];
            if current.vx.is_none() || current.vy.is_none() {
                let (vx, vy) = prev
                    .and_then(|prev| {
                        let dt = current.timestamp? - prev.timestamp?;
                        (dt > 0.0).then(|| ((current.x - prev.x) / dt, (current.y - prev.y) / dt))
                    })
                    .unwrap_or((0.0, 0.0));
                updates.push((idx, vx, vy));
            }
            prev = Some(current);
        }
    }

    for (idx, vx, vy) in updates {
        points[idx].vx = Some(vx);
        points[idx].vy = Some(vy);
    }
}
