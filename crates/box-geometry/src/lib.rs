//! Oriented Box Geometry
//!
//! Converts an actor pose (center, heading, extents) into a closed
//! rectangle polygon in the global ground plane. Corners are listed
//! counter-clockwise starting at rear-right `(-L/2, -W/2)`: rear-right,
//! rear-left, front-left, front-right, then the first corner again.
//!
//! Non-finite inputs propagate to non-finite outputs; nothing is clamped.

pub mod config;

pub use config::{DimensionDefaults, Dimensions, GeometryConfig};

use motion_log::{ObjectKind, TrackPoint};
use serde::{Deserialize, Serialize};

/// Planar point (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Number of points in a closed box outline
pub const BOX_POINTS: usize = 5;

/// Rectangle corners around `(cx, cy)` rotated by `heading` (radians).
///
/// Pure and total: extents are used as given.
pub fn box_polygon(
    cx: f64,
    cy: f64,
    heading: f64,
    length: f64,
    width: f64,
) -> [Point2; BOX_POINTS] {
    let l2 = length / 2.0;
    let w2 = width / 2.0;
    let (s, c) = heading.sin_cos();

    let corner = |ox: f64, oy: f64| Point2::new(c * ox - s * oy + cx, s * ox + c * oy + cy);

    let rear_right = corner(-l2, -w2);
    [
        rear_right,
        corner(-l2, w2),
        corner(l2, w2),
        corner(l2, -w2),
        rear_right,
    ]
}

/// Inputs needed to outline one actor
#[derive(Debug, Clone, Copy)]
pub struct BoxPose {
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub length: Option<f64>,
    pub width: Option<f64>,
}

impl From<&TrackPoint> for BoxPose {
    fn from(point: &TrackPoint) -> Self {
        Self {
            kind: point.kind(),
            x: point.x,
            y: point.y,
            heading: point.heading,
            length: point.length,
            width: point.width,
        }
    }
}

/// Closed outline of one actor in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub points: [Point2; BOX_POINTS],
}

impl OrientedBox {
    /// Outline a pose, substituting default extents where needed
    pub fn from_pose(pose: BoxPose, config: &GeometryConfig) -> Self {
        let dims = config.resolve(pose.kind, pose.length, pose.width);
        Self {
            points: box_polygon(pose.x, pose.y, pose.heading, dims.length, dims.width),
        }
    }

    /// Outline a track point
    pub fn for_point(point: &TrackPoint, config: &GeometryConfig) -> Self {
        Self::from_pose(BoxPose::from(point), config)
    }

    /// First and last points are bit-identical (holds for NaN too)
    pub fn is_closed(&self) -> bool {
        let first = self.points[0];
        let last = self.points[BOX_POINTS - 1];
        first.x.to_bits() == last.x.to_bits() && first.y.to_bits() == last.y.to_bits()
    }

    /// X coordinates in outline order, for plotting consumers
    pub fn xs(&self) -> [f64; BOX_POINTS] {
        self.points.map(|p| p.x)
    }

    /// Y coordinates in outline order
    pub fn ys(&self) -> [f64; BOX_POINTS] {
        self.points.map(|p| p.y)
    }
}
