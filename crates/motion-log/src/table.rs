//! Trajectory and map tables loaded from CSV

use crate::reader::{Header, Row};
use crate::{MapFeatureType, MapPoint, SchemaError, TrackPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Which optional trajectory columns the source provided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalColumns {
    pub timestamp: bool,
    pub frame_id: bool,
    /// Both `vx` and `vy` present
    pub velocity: bool,
    pub length: bool,
    pub width: bool,
    pub height: bool,
    pub is_ego: bool,
}

impl OptionalColumns {
    /// Every optional column present
    pub fn all() -> Self {
        Self {
            timestamp: true,
            frame_id: true,
            velocity: true,
            length: true,
            width: true,
            height: true,
            is_ego: true,
        }
    }
}

/// Open a file for reading, mapping "not found" to `None`
fn open_existing(path: &Path) -> Result<Option<File>, SchemaError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Source file {} does not exist", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

/// Canonical trajectory table, one row per observed track point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryTable {
    pub points: Vec<TrackPoint>,
    pub columns: OptionalColumns,
}

impl TrajectoryTable {
    pub fn new(points: Vec<TrackPoint>, columns: OptionalColumns) -> Self {
        Self { points, columns }
    }

    /// Load a trajectory CSV; `Ok(None)` if the file does not exist
    pub fn open(path: &Path) -> Result<Option<Self>, SchemaError> {
        let Some(file) = open_existing(path)? else {
            return Ok(None);
        };
        let table = Self::from_reader(io::BufReader::new(file))?;
        info!(
            "Loaded {} track points from {}",
            table.points.len(),
            path.display()
        );
        Ok(Some(table))
    }

    /// Parse a trajectory table from any CSV source
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, SchemaError> {
        let mut reader = csv_reader(rdr);
        let header = Header::new(reader.headers()?);

        let scenario_idx = header.required("scenario_id")?;
        let track_idx = header.required("track_id")?;
        let type_idx = header.required("type")?;
        let x_idx = header.required("x")?;
        let y_idx = header.required("y")?;
        let heading_idx = header.required("heading")?;

        let timestamp_idx = header.optional("timestamp");
        let frame_idx = header.optional("frame_id");
        let (vx_idx, vy_idx) = match (header.optional("vx"), header.optional("vy")) {
            (Some(vx), Some(vy)) => (Some(vx), Some(vy)),
            _ => (None, None),
        };
        let length_idx = header.optional("length");
        let width_idx = header.optional("width");
        let height_idx = header.optional("height");
        let ego_idx = header.optional("is_ego");

        let columns = OptionalColumns {
            timestamp: timestamp_idx.is_some(),
            frame_id: frame_idx.is_some(),
            velocity: vx_idx.is_some(),
            length: length_idx.is_some(),
            width: width_idx.is_some(),
            height: height_idx.is_some(),
            is_ego: ego_idx.is_some(),
        };
        debug!("Trajectory optional columns: {:?}", columns);

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = Row::new(&record);
            points.push(TrackPoint {
                scenario_id: row.text(scenario_idx),
                track_id: row.text(track_idx),
                timestamp: row.opt_float(timestamp_idx, "timestamp")?,
                frame_id: row.opt_int(frame_idx, "frame_id")?,
                object_type: row.text(type_idx),
                x: row.float(x_idx, "x")?,
                y: row.float(y_idx, "y")?,
                heading: row.float(heading_idx, "heading")?,
                vx: row.opt_float(vx_idx, "vx")?,
                vy: row.opt_float(vy_idx, "vy")?,
                length: row.opt_float(length_idx, "length")?,
                width: row.opt_float(width_idx, "width")?,
                height: row.opt_float(height_idx, "height")?,
                is_ego: row.opt_bool(ego_idx, "is_ego")?,
            });
        }

        Ok(Self { points, columns })
    }

    /// Distinct scenario ids in order of first appearance
    pub fn scenario_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.points
            .iter()
            .filter(|p| seen.insert(p.scenario_id.as_str()))
            .map(|p| p.scenario_id.clone())
            .collect()
    }

    /// Copy of the rows belonging to one scenario; `self` is left untouched
    pub fn scenario(&self, scenario_id: &str) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.scenario_id == scenario_id)
                .cloned()
                .collect(),
            columns: self.columns,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Canonical map-feature table, one row per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapTable {
    pub points: Vec<MapPoint>,
}

impl MapTable {
    pub fn new(points: Vec<MapPoint>) -> Self {
        Self { points }
    }

    /// Load a map CSV; `Ok(None)` if the file does not exist
    pub fn open(path: &Path) -> Result<Option<Self>, SchemaError> {
        let Some(file) = open_existing(path)? else {
            return Ok(None);
        };
        let table = Self::from_reader(io::BufReader::new(file))?;
        info!(
            "Loaded {} map vertices from {}",
            table.points.len(),
            path.display()
        );
        Ok(Some(table))
    }

    /// Parse a map table from any CSV source
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, SchemaError> {
        let mut reader = csv_reader(rdr);
        let header = Header::new(reader.headers()?);

        let scenario_idx = header.required("scenario_id")?;
        let feature_idx = header.required_any(&["feature_id", "line_id"])?;
        let type_idx = header.required("type")?;
        let x_idx = header.required("x")?;
        let y_idx = header.required("y")?;
        let order_idx = header.required("order")?;

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = Row::new(&record);
            points.push(MapPoint {
                scenario_id: row.text(scenario_idx),
                feature_id: row.text(feature_idx),
                feature_type: MapFeatureType::parse(&row.text(type_idx)),
                x: row.float(x_idx, "x")?,
                y: row.float(y_idx, "y")?,
                order: row.int(order_idx, "order")?,
            });
        }

        Ok(Self { points })
    }

    /// Copy of the vertices belonging to one scenario
    pub fn scenario(&self, scenario_id: &str) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.scenario_id == scenario_id)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WAYMO_CSV: &str = "\
scenario_id,timestamp,frame_id,track_id,type,is_ego,x,y,z,heading,vx,vy,length,width,height
a,0.0,0,1,TYPE_VEHICLE,True,10.0,20.0,0.0,0.0,3.0,4.0,4.5,2.0,1.5
a,0.1,1,1,TYPE_VEHICLE,True,10.5,20.0,0.0,0.0,3.0,4.0,4.5,2.0,1.5
b,0.0,0,9,TYPE_PEDESTRIAN,False,1.0,2.0,0.0,1.57,,,0.5,0.5,1.8
";

    #[test]
    fn test_read_full_schema() {
        let table = TrajectoryTable::from_reader(WAYMO_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns, OptionalColumns::all());

        let first = &table.points[0];
        assert_eq!(first.scenario_id, "a");
        assert_eq!(first.track_id, "1");
        assert_eq!(first.frame_id, Some(0));
        assert_eq!(first.is_ego, Some(true));
        assert_eq!(first.vx, Some(3.0));

        let ped = &table.points[2];
        assert_eq!(ped.vx, None);
        assert_eq!(ped.is_ego, Some(false));
    }

    #[test]
    fn test_missing_optional_columns_are_recorded() {
        let csv = "scenario_id,track_id,type,x,y,heading\ns,1,TYPE_VEHICLE,0,0,0\n";
        let table = TrajectoryTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, OptionalColumns::default());
        assert_eq!(table.points[0].timestamp, None);
        assert_eq!(table.points[0].length, None);
    }

    #[test]
    fn test_velocity_requires_both_components() {
        let csv = "scenario_id,track_id,type,x,y,heading,vx\ns,1,TYPE_VEHICLE,0,0,0,5.0\n";
        let table = TrajectoryTable::from_reader(csv.as_bytes()).unwrap();
        assert!(!table.columns.velocity);
        assert_eq!(table.points[0].vx, None);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let csv = "scenario_id,track_id,type,x,y\ns,1,TYPE_VEHICLE,0,0\n";
        let err = TrajectoryTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn("heading")));
    }

    #[test]
    fn test_non_numeric_coordinate_is_fatal() {
        let csv = "scenario_id,track_id,type,x,y,heading\ns,1,TYPE_VEHICLE,abc,0,0\n";
        let err = TrajectoryTable::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            SchemaError::InvalidValue { column, line, value } => {
                assert_eq!(column, "x");
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_coordinate_reads_as_nan() {
        let csv = "scenario_id,track_id,type,x,y,heading\ns,1,TYPE_VEHICLE,,0,0\n";
        let table = TrajectoryTable::from_reader(csv.as_bytes()).unwrap();
        assert!(table.points[0].x.is_nan());
    }

    #[test]
    fn test_float_frame_ids_accepted() {
        let csv = "scenario_id,track_id,type,x,y,heading,frame_id\ns,1,TYPE_VEHICLE,0,0,0,3.0\n";
        let table = TrajectoryTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.points[0].frame_id, Some(3));
    }

    #[test]
    fn test_fractional_frame_id_is_fatal() {
        let csv = "scenario_id,track_id,type,x,y,heading,frame_id\ns,1,TYPE_VEHICLE,0,0,0,3.5\n";
        let err = TrajectoryTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { column: "frame_id", .. }));
    }

    #[test]
    fn test_ego_flag_spellings() {
        let csv = "\
scenario_id,track_id,type,x,y,heading,is_ego
s,1,TYPE_VEHICLE,0,0,0,TRUE
s,2,TYPE_VEHICLE,0,0,0,0
s,3,TYPE_VEHICLE,0,0,0,
";
        let table = TrajectoryTable::from_reader(csv.as_bytes()).unwrap();
        let flags: Vec<_> = table.points.iter().map(|p| p.is_ego).collect();
        assert_eq!(flags, vec![Some(true), Some(false), None]);

        let bad = "scenario_id,track_id,type,x,y,heading,is_ego\ns,1,TYPE_VEHICLE,0,0,0,yes\n";
        let err = TrajectoryTable::from_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { column: "is_ego", .. }));
    }

    #[test]
    fn test_scenario_ids_first_appearance_order() {
        let table = TrajectoryTable::from_reader(WAYMO_CSV.as_bytes()).unwrap();
        assert_eq!(table.scenario_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_scenario_filter_leaves_source_intact() {
        let table = TrajectoryTable::from_reader(WAYMO_CSV.as_bytes()).unwrap();
        let a = table.scenario("a");
        assert_eq!(a.len(), 2);
        assert_eq!(table.len(), 3);
        assert!(table.scenario("missing").is_empty());
    }

    #[test]
    fn test_open_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(TrajectoryTable::open(&path).unwrap().is_none());
        assert!(MapTable::open(&path).unwrap().is_none());
    }

    #[test]
    fn test_open_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(WAYMO_CSV.as_bytes()).unwrap();

        let table = TrajectoryTable::open(&path).unwrap().unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_map_accepts_line_id_alias() {
        let csv = "\
scenario_id,line_id,type,x,y,order
s,L1,ROAD_LINE,1.0,2.0,0
s,L1,ROAD_LINE,2.0,2.0,1
";
        let table = MapTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.points[1].feature_id, "L1");
        assert_eq!(table.points[1].feature_type, MapFeatureType::RoadLine);
        assert_eq!(table.points[1].order, 1);
    }

    #[test]
    fn test_map_requires_order() {
        let csv = "scenario_id,feature_id,type,x,y\ns,F,ROAD_EDGE,1.0,2.0\n";
        let err = MapTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn("order")));
    }
}
