//! Geometry configuration

use motion_log::ObjectKind;
use serde::{Deserialize, Serialize};

/// Footprint of an object (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
}

impl Dimensions {
    pub const fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

/// Default footprints substituted when a row has no usable extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionDefaults {
    pub pedestrian: Dimensions,
    pub cyclist: Dimensions,
    /// Used for vehicles and every unrecognised type
    pub vehicle: Dimensions,
}

impl Default for DimensionDefaults {
    fn default() -> Self {
        Self {
            pedestrian: Dimensions::new(0.8, 0.8),
            cyclist: Dimensions::new(1.8, 0.8),
            vehicle: Dimensions::new(4.7, 2.0),
        }
    }
}

impl DimensionDefaults {
    /// Pick the default footprint for an object category
    pub fn for_kind(&self, kind: ObjectKind) -> Dimensions {
        match kind {
            ObjectKind::Pedestrian => self.pedestrian,
            ObjectKind::Cyclist => self.cyclist,
            ObjectKind::Vehicle | ObjectKind::Other => self.vehicle,
        }
    }
}

/// Geometry engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Class-specific fallback footprints
    pub defaults: DimensionDefaults,

    /// Extents below this (meters) are treated as missing
    pub min_dimension_m: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            defaults: DimensionDefaults::default(),
            min_dimension_m: 0.1,
        }
    }
}

impl GeometryConfig {
    fn usable(&self, extent: Option<f64>) -> Option<f64> {
        extent.filter(|v| !v.is_nan() && *v >= self.min_dimension_m)
    }

    /// Resolve the footprint to draw for a row.
    ///
    /// If either extent is missing, NaN or below `min_dimension_m`, both are
    /// replaced by the class default so no zero-area box is ever produced.
    pub fn resolve(
        &self,
        kind: ObjectKind,
        length: Option<f64>,
        width: Option<f64>,
    ) -> Dimensions {
        match (self.usable(length), self.usable(width)) {
            (Some(length), Some(width)) => Dimensions::new(length, width),
            _ => self.defaults.for_kind(kind),
        }
    }
}
