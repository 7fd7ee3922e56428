//! Filtered raw-data export

use motion_log::OptionalColumns;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use thiserror::Error;
use track_engine::{distinct_frame_ids, TrackFrame};

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Row filter; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilter {
    pub object_type: Option<String>,
    pub track_id: Option<String>,
    pub frame_id: Option<i64>,
}

impl ExportFilter {
    pub fn matches(&self, frame: &TrackFrame) -> bool {
        self.object_type
            .as_deref()
            .map_or(true, |t| frame.object_type() == t)
            && self
                .track_id
                .as_deref()
                .map_or(true, |id| frame.track_id() == id)
            && self.frame_id.map_or(true, |id| frame.frame_id == id)
    }

    pub fn apply<'a>(&self, frames: &'a [TrackFrame]) -> Vec<&'a TrackFrame> {
        frames.iter().filter(|f| self.matches(f)).collect()
    }
}

/// Download name for a scenario's export
pub fn export_file_name(scenario_id: &str) -> String {
    format!("scenario_{}.csv", scenario_id)
}

/// Sorted distinct object types
pub fn type_options(frames: &[TrackFrame]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f.object_type().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct track ids, restricted to one type when given
pub fn track_id_options(frames: &[TrackFrame], object_type: Option<&str>) -> Vec<String> {
    frames
        .iter()
        .filter(|f| object_type.map_or(true, |t| f.object_type() == t))
        .map(|f| f.track_id().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct frame ids
pub fn frame_options(frames: &[TrackFrame]) -> Vec<i64> {
    distinct_frame_ids(frames)
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn header(columns: &OptionalColumns) -> Vec<&'static str> {
    let mut header = vec!["scenario_id"];
    if columns.timestamp {
        header.push("timestamp");
    }
    header.extend(["frame_id", "track_id", "type"]);
    if columns.is_ego {
        header.push("is_ego");
    }
    header.extend(["x", "y", "heading"]);
    if columns.velocity {
        header.extend(["vx", "vy"]);
    }
    if columns.length {
        header.push("length");
    }
    if columns.width {
        header.push("width");
    }
    if columns.height {
        header.push("height");
    }
    header.push("speed_kmh");
    header
}

fn record(frame: &TrackFrame, columns: &OptionalColumns) -> Vec<String> {
    let p = &frame.point;
    let mut record = vec![p.scenario_id.clone()];
    if columns.timestamp {
        record.push(opt_cell(p.timestamp));
    }
    record.extend([
        frame.frame_id.to_string(),
        p.track_id.clone(),
        p.object_type.clone(),
    ]);
    if columns.is_ego {
        record.push(p.is_ego.map(|e| e.to_string()).unwrap_or_default());
    }
    record.extend([p.x.to_string(), p.y.to_string(), p.heading.to_string()]);
    if columns.velocity {
        record.extend([opt_cell(p.vx), opt_cell(p.vy)]);
    }
    if columns.length {
        record.push(opt_cell(p.length));
    }
    if columns.width {
        record.push(opt_cell(p.width));
    }
    if columns.height {
        record.push(opt_cell(p.height));
    }
    record.push(frame.speed_kmh.to_string());
    record
}

/// Write the rows matching `filter` as CSV with a header.
///
/// Optional source columns are written only when the source had them;
/// `frame_id` and `speed_kmh` are always present. Returns the row count.
pub fn write_csv<W: Write>(
    writer: W,
    frames: &[TrackFrame],
    columns: &OptionalColumns,
    filter: &ExportFilter,
) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(columns))?;

    let mut rows = 0;
    for frame in filter.apply(frames) {
        wtr.write_record(record(frame, columns))?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_log::{TrackPoint, TrajectoryTable};

    fn frames() -> Vec<TrackFrame> {
        vec![
            TrackFrame::new(
                TrackPoint::new("s1", "2", "TYPE_VEHICLE", 1.5, 2.0, 0.25).with_velocity(3.0, 4.0),
                0,
                18.0,
            ),
            TrackFrame::new(
                TrackPoint::new("s1", "10", "TYPE_PEDESTRIAN", 0.0, 0.0, 0.0),
                0,
                0.0,
            ),
            TrackFrame::new(
                TrackPoint::new("s1", "2", "TYPE_VEHICLE", 3.0, 2.0, 0.25).with_velocity(3.0, 4.0),
                1,
                18.0,
            ),
        ]
    }

    fn velocity_only() -> OptionalColumns {
        OptionalColumns {
            velocity: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_exact_matches() {
        let frames = frames();
        assert_eq!(ExportFilter::default().apply(&frames).len(), 3);

        let by_type = ExportFilter {
            object_type: Some("TYPE_VEHICLE".to_string()),
            ..Default::default()
        };
        assert_eq!(by_type.apply(&frames).len(), 2);

        // Exact, not substring
        let partial = ExportFilter {
            object_type: Some("VEHICLE".to_string()),
            ..Default::default()
        };
        assert!(partial.apply(&frames).is_empty());

        let combined = ExportFilter {
            track_id: Some("2".to_string()),
            frame_id: Some(1),
            ..Default::default()
        };
        let hits = combined.apply(&frames);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point.x, 3.0);
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        let filter = ExportFilter {
            frame_id: Some(0),
            ..Default::default()
        };
        let rows = write_csv(&mut out, &frames(), &velocity_only(), &filter).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "scenario_id,frame_id,track_id,type,x,y,heading,vx,vy,speed_kmh"
        );
        assert_eq!(lines[1], "s1,0,2,TYPE_VEHICLE,1.5,2,0.25,3,4,18");
        assert_eq!(lines[2], "s1,0,10,TYPE_PEDESTRIAN,0,0,0,,,0");
    }

    #[test]
    fn test_export_reads_back_as_trajectory_table() {
        let mut out = Vec::new();
        write_csv(&mut out, &frames(), &velocity_only(), &ExportFilter::default()).unwrap();

        let table = TrajectoryTable::from_reader(out.as_slice()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.columns.frame_id);
        assert_eq!(table.points[2].frame_id, Some(1));
    }

    #[test]
    fn test_empty_selection_writes_header_only() {
        let mut out = Vec::new();
        let filter = ExportFilter {
            track_id: Some("nope".to_string()),
            ..Default::default()
        };
        let rows = write_csv(&mut out, &frames(), &OptionalColumns::default(), &filter).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_picker_options() {
        let frames = frames();
        assert_eq!(type_options(&frames), vec!["TYPE_PEDESTRIAN", "TYPE_VEHICLE"]);
        assert_eq!(track_id_options(&frames, None), vec!["10", "2"]);
        assert_eq!(track_id_options(&frames, Some("TYPE_VEHICLE")), vec!["2"]);
        assert_eq!(frame_options(&frames), vec![0, 1]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("abc123"), "scenario_abc123.csv");
    }
}
