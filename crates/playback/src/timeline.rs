//! Per-frame actor outlines and trails

use box_geometry::{GeometryConfig, OrientedBox, Point2, BOX_POINTS};
use scenario_loader::ScenarioBundle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use track_engine::{distinct_frame_ids, TrackFrame};
use tracing::debug;

/// One labelled actor outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorBox {
    pub track_id: String,
    pub polygon: [Point2; BOX_POINTS],
    pub label: String,
}

impl ActorBox {
    fn new(frame: &TrackFrame, label: String, geometry: &GeometryConfig) -> Self {
        Self {
            track_id: frame.track_id().to_string(),
            polygon: OrientedBox::for_point(&frame.point, geometry).points,
            label,
        }
    }
}

pub(crate) fn static_label(frame: &TrackFrame) -> String {
    format!("Static ID: {}", frame.track_id())
}

pub(crate) fn moving_label(frame: &TrackFrame) -> String {
    format!("Car ID: {} V: {:.1} km/h", frame.track_id(), frame.speed_kmh)
}

pub(crate) fn vru_label(frame: &TrackFrame) -> String {
    format!("{} ID: {}", frame.object_type(), frame.track_id())
}

/// Dynamic actors visible in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub frame_id: i64,
    pub moving_vehicles: Vec<ActorBox>,
    pub vrus: Vec<ActorBox>,
}

/// Path of one dynamic track over the whole scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub track_id: String,
    pub points: Vec<Point2>,
}

/// Render-ready playback of one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub scenario_id: String,
    /// Parked vehicles, drawn once for the whole scenario
    pub static_boxes: Vec<ActorBox>,
    /// One view per frame id, ascending
    pub frames: Vec<FrameView>,
    /// Moving-vehicle and VRU trails, by track id
    pub trails: Vec<Trail>,
}

impl Timeline {
    pub fn build(bundle: &ScenarioBundle, geometry: &GeometryConfig) -> Self {
        let classification = &bundle.classification;

        let static_boxes = classification
            .static_actors
            .iter()
            .map(|f| ActorBox::new(f, static_label(f), geometry))
            .collect();

        let mut views: BTreeMap<i64, FrameView> = distinct_frame_ids(&bundle.frames)
            .into_iter()
            .map(|frame_id| {
                (
                    frame_id,
                    FrameView {
                        frame_id,
                        ..Default::default()
                    },
                )
            })
            .collect();

        for f in &classification.moving_vehicles {
            if let Some(view) = views.get_mut(&f.frame_id) {
                view.moving_vehicles
                    .push(ActorBox::new(f, moving_label(f), geometry));
            }
        }
        for f in &classification.vrus {
            if let Some(view) = views.get_mut(&f.frame_id) {
                view.vrus.push(ActorBox::new(f, vru_label(f), geometry));
            }
        }

        let mut trails: BTreeMap<&str, Vec<Point2>> = BTreeMap::new();
        for f in classification
            .moving_vehicles
            .iter()
            .chain(&classification.vrus)
        {
            trails
                .entry(f.track_id())
                .or_default()
                .push(Point2::new(f.point.x, f.point.y));
        }

        let timeline = Self {
            scenario_id: bundle.scenario_id.clone(),
            static_boxes,
            frames: views.into_values().collect(),
            trails: trails
                .into_iter()
                .map(|(track_id, points)| Trail {
                    track_id: track_id.to_string(),
                    points,
                })
                .collect(),
        };
        debug!(
            "Built timeline for {}: {} frames, {} static boxes, {} trails",
            timeline.scenario_id,
            timeline.frames.len(),
            timeline.static_boxes.len(),
            timeline.trails.len()
        );
        timeline
    }

    /// View of one frame
    pub fn frame(&self, frame_id: i64) -> Option<&FrameView> {
        self.frames
            .binary_search_by_key(&frame_id, |v| v.frame_id)
            .ok()
            .map(|idx| &self.frames[idx])
    }

    /// First frame, shown before playback starts
    pub fn initial_frame(&self) -> Option<&FrameView> {
        self.frames.first()
    }

    pub fn frame_ids(&self) -> Vec<i64> {
        self.frames.iter().map(|v| v.frame_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
