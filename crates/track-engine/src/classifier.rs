//! Static / moving-vehicle / VRU track classification

use crate::TrackFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Category assigned to a whole track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackCategory {
    /// Parked vehicle, drawn once
    Static,
    /// Vehicle that moved at some point in the scenario
    MovingVehicle,
    /// Pedestrian, cyclist or any other non-vehicle actor
    Vru,
}

/// Classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// A vehicle whose maximum speed stays below this (km/h) is static
    pub static_speed_threshold_kmh: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            static_speed_threshold_kmh: 1.0,
        }
    }
}

/// Per-track reduction over all of a track's rows
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAggregate {
    /// Maximum speed over every frame (km/h)
    pub max_speed_kmh: f64,
    /// Type at the track's first frame; later frames are never consulted
    pub object_type: String,
    /// Row index of the track's first frame
    pub first_row: usize,
    /// Number of rows observed
    pub row_count: usize,
}

/// Classifier output: three disjoint row sets plus the per-track decision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// One representative row (first frame) per static track
    pub static_actors: Vec<TrackFrame>,
    /// Every row of every moving-vehicle track
    pub moving_vehicles: Vec<TrackFrame>,
    /// Every row of every VRU track
    pub vrus: Vec<TrackFrame>,
    /// Category of each track id
    pub categories: BTreeMap<String, TrackCategory>,
}

impl Classification {
    /// Track ids in one category, sorted
    pub fn track_ids(&self, category: TrackCategory) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn category_of(&self, track_id: &str) -> Option<TrackCategory> {
        self.categories.get(track_id).copied()
    }
}

/// Partitions a scenario's tracks using per-track aggregates
#[derive(Debug, Clone, Default)]
pub struct TrackClassifier {
    config: ClassifierConfig,
}

impl TrackClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Reduce rows to one aggregate per track
    pub fn aggregate(&self, rows: &[TrackFrame]) -> BTreeMap<String, TrackAggregate> {
        let mut aggregates: BTreeMap<String, TrackAggregate> = BTreeMap::new();

        for (idx, row) in rows.iter().enumerate() {
            match aggregates.get_mut(row.track_id()) {
                Some(agg) => {
                    agg.max_speed_kmh = agg.max_speed_kmh.max(row.speed_kmh);
                    agg.row_count += 1;
                    // Earliest frame wins; ties keep the earlier row
                    if row.frame_id < rows[agg.first_row].frame_id {
                        agg.first_row = idx;
                        agg.object_type = row.object_type().to_string();
                    }
                }
                None => {
                    aggregates.insert(
                        row.track_id().to_string(),
                        TrackAggregate {
                            max_speed_kmh: row.speed_kmh,
                            object_type: row.object_type().to_string(),
                            first_row: idx,
                            row_count: 1,
                        },
                    );
                }
            }
        }

        aggregates
    }

    /// Decide one track's category from its aggregate.
    ///
    /// The `VEHICLE` match is case-sensitive; a track typed `vehicle` is a VRU.
    pub fn categorize(&self, aggregate: &TrackAggregate) -> TrackCategory {
        let is_vehicle = aggregate.object_type.contains("VEHICLE");
        if is_vehicle && aggregate.max_speed_kmh < self.config.static_speed_threshold_kmh {
            TrackCategory::Static
        } else if is_vehicle {
            TrackCategory::MovingVehicle
        } else {
            TrackCategory::Vru
        }
    }

    /// Partition rows in a single pass over the table
    pub fn classify(&self, rows: &[TrackFrame]) -> Classification {
        let aggregates = self.aggregate(rows);
        let categories: BTreeMap<String, TrackCategory> = aggregates
            .iter()
            .map(|(id, agg)| (id.clone(), self.categorize(agg)))
            .collect();

        let mut result = Classification::default();
        for (idx, row) in rows.iter().enumerate() {
            let Some(category) = categories.get(row.track_id()) else {
                continue;
            };
            match category {
                TrackCategory::Static => {
                    if aggregates[row.track_id()].first_row == idx {
                        result.static_actors.push(row.clone());
                    }
                }
                TrackCategory::MovingVehicle => result.moving_vehicles.push(row.clone()),
                TrackCategory::Vru => result.vrus.push(row.clone()),
            }
        }

        debug!(
            "Classified {} tracks: {} static, {} moving-vehicle rows, {} VRU rows",
            categories.len(),
            result.static_actors.len(),
            result.moving_vehicles.len(),
            result.vrus.len()
        );

        result.categories = categories;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_log::TrackPoint;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn frame(track: &str, object_type: &str, frame_id: i64, speed: f64) -> TrackFrame {
        TrackFrame::new(
            TrackPoint::new("s", track, object_type, frame_id as f64, 0.0, 0.0),
            frame_id,
            speed,
        )
    }

    fn rows_of(frames: &[TrackFrame], track: &str) -> usize {
        frames.iter().filter(|f| f.track_id() == track).count()
    }

    fn fixture() -> Vec<TrackFrame> {
        vec![
            frame("A", "TYPE_VEHICLE", 0, 0.0),
            frame("B", "TYPE_VEHICLE", 0, 0.0),
            frame("C", "TYPE_PEDESTRIAN", 0, 0.0),
            frame("A", "TYPE_VEHICLE", 1, 0.3),
            frame("B", "TYPE_VEHICLE", 1, 1.5),
            frame("C", "TYPE_PEDESTRIAN", 1, 0.0),
            frame("A", "TYPE_VEHICLE", 2, 0.9),
        ]
    }

    #[test]
    fn test_static_conjunction_examples() {
        let result = TrackClassifier::default().classify(&fixture());

        assert_eq!(result.category_of("A"), Some(TrackCategory::Static));
        assert_eq!(result.category_of("B"), Some(TrackCategory::MovingVehicle));
        assert_eq!(result.category_of("C"), Some(TrackCategory::Vru));
    }

    #[test]
    fn test_static_track_reduced_to_first_frame() {
        let result = TrackClassifier::default().classify(&fixture());

        assert_eq!(result.static_actors.len(), 1);
        assert_eq!(result.static_actors[0].track_id(), "A");
        assert_eq!(result.static_actors[0].frame_id, 0);
    }

    #[test]
    fn test_dynamic_tracks_keep_every_frame() {
        let result = TrackClassifier::default().classify(&fixture());

        assert_eq!(rows_of(&result.moving_vehicles, "B"), 2);
        assert_eq!(rows_of(&result.vrus, "C"), 2);
        assert_eq!(rows_of(&result.moving_vehicles, "A"), 0);
    }

    #[test]
    fn test_first_frame_found_regardless_of_row_order() {
        let rows = vec![
            frame("A", "TYPE_VEHICLE", 5, 0.0),
            frame("A", "TYPE_VEHICLE", 2, 0.0),
            frame("A", "TYPE_VEHICLE", 9, 0.0),
        ];
        let result = TrackClassifier::default().classify(&rows);
        assert_eq!(result.static_actors.len(), 1);
        assert_eq!(result.static_actors[0].frame_id, 2);
    }

    #[test]
    fn test_first_frame_type_wins() {
        // Type flips after the first frame; the first observation decides
        let rows = vec![
            frame("X", "TYPE_PEDESTRIAN", 0, 0.0),
            frame("X", "TYPE_VEHICLE", 1, 0.0),
        ];
        let result = TrackClassifier::default().classify(&rows);
        assert_eq!(result.category_of("X"), Some(TrackCategory::Vru));
        assert_eq!(rows_of(&result.vrus, "X"), 2);
    }

    #[test]
    fn test_single_frame_vehicle_is_static() {
        let result = TrackClassifier::default().classify(&[frame("V", "TYPE_VEHICLE", 0, 0.0)]);
        assert_eq!(result.category_of("V"), Some(TrackCategory::Static));
    }

    #[test]
    fn test_vehicle_match_is_case_sensitive() {
        let rows = vec![
            frame("X", "vehicle", 0, 0.0),
            frame("Y", "Type_Vehicle", 0, 30.0),
        ];
        let result = TrackClassifier::default().classify(&rows);
        assert_eq!(result.category_of("X"), Some(TrackCategory::Vru));
        assert_eq!(result.category_of("Y"), Some(TrackCategory::Vru));
        assert!(result.static_actors.is_empty());
    }

    #[test]
    fn test_slow_non_vehicle_never_static() {
        let rows = vec![
            frame("P", "TYPE_PEDESTRIAN", 0, 0.0),
            frame("Q", "TYPE_CYCLIST", 0, 0.2),
            frame("O", "TYPE_OTHER", 0, 0.0),
        ];
        let result = TrackClassifier::default().classify(&rows);
        assert!(result.static_actors.is_empty());
        assert_eq!(result.vrus.len(), 3);
    }

    #[test]
    fn test_threshold_is_configurable_and_strict() {
        let rows = vec![frame("A", "TYPE_VEHICLE", 0, 1.0)];
        let default = TrackClassifier::default().classify(&rows);
        assert_eq!(default.category_of("A"), Some(TrackCategory::MovingVehicle));

        let relaxed = TrackClassifier::new(ClassifierConfig {
            static_speed_threshold_kmh: 5.0,
        })
        .classify(&rows);
        assert_eq!(relaxed.category_of("A"), Some(TrackCategory::Static));
    }

    #[test]
    fn test_empty_scenario() {
        let result = TrackClassifier::default().classify(&[]);
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_track_ids_by_category() {
        let result = TrackClassifier::default().classify(&fixture());
        assert_eq!(result.track_ids(TrackCategory::Static), vec!["A"]);
        assert_eq!(result.track_ids(TrackCategory::Vru), vec!["C"]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<TrackFrame>> {
        let types = prop_oneof![
            Just("TYPE_VEHICLE"),
            Just("TYPE_PEDESTRIAN"),
            Just("TYPE_CYCLIST"),
            Just("TYPE_OTHER"),
            Just("vehicle"),
            Just("Type_Vehicle"),
        ];
        proptest::collection::vec((0u8..12, types, 0i64..20, 0.0f64..5.0), 0..120).prop_map(
            |raw| {
                raw.into_iter()
                    .map(|(track, t, f, speed)| frame(&format!("T{track}"), t, f, speed))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete_and_disjoint(rows in arb_rows()) {
            let result = TrackClassifier::default().classify(&rows);

            let ids = |frames: &[TrackFrame]| -> BTreeSet<String> {
                frames.iter().map(|f| f.track_id().to_string()).collect()
            };
            let stat = ids(&result.static_actors);
            let moving = ids(&result.moving_vehicles);
            let vru = ids(&result.vrus);
            let all = ids(&rows);

            prop_assert!(stat.is_disjoint(&moving));
            prop_assert!(stat.is_disjoint(&vru));
            prop_assert!(moving.is_disjoint(&vru));

            let union: BTreeSet<String> = stat.union(&moving).cloned().collect::<BTreeSet<_>>()
                .union(&vru).cloned().collect();
            prop_assert_eq!(union, all);

            // One representative per static track
            prop_assert_eq!(result.static_actors.len(), stat.len());
        }

        #[test]
        fn prop_static_iff_vehicle_and_slow(rows in arb_rows()) {
            let classifier = TrackClassifier::default();
            let result = classifier.classify(&rows);

            for (id, agg) in classifier.aggregate(&rows) {
                let expected = agg.object_type.contains("VEHICLE") && agg.max_speed_kmh < 1.0;
                prop_assert_eq!(result.category_of(&id) == Some(TrackCategory::Static), expected);
            }
        }
    }
}
