//! Geographic bounding boxes, points and map viewports.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Parse a "minx,miny,maxx,maxy" string.
    pub fn from_csv(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        Ok(Self {
            min_x: parse(parts[0])?,
            min_y: parse(parts[1])?,
            max_x: parse(parts[2])?,
            max_y: parse(parts[3])?,
        })
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_y + self.max_y) / 2.0,
            (self.min_x + self.max_x) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Generate a cache key fragment for this bbox (quantized to avoid floating point issues).
    pub fn cache_key(&self) -> String {
        format!(
            "{:.6}_{:.6}_{:.6}_{:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// What a map pane is looking at.
///
/// Deserialized viewports go through [`Viewport::new`], so client-supplied
/// zoom levels are clamped the same way as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewportFields")]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

#[derive(Deserialize)]
struct ViewportFields {
    center: GeoPoint,
    zoom: u8,
}

impl From<ViewportFields> for Viewport {
    fn from(fields: ViewportFields) -> Self {
        Viewport::new(fields.center, fields.zoom)
    }
}

impl Viewport {
    pub const MAX_ZOOM: u8 = 18;

    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(Self::MAX_ZOOM),
        }
    }

    /// Approximate visible bounds for a 256px-tile web map of the given pixel size.
    pub fn bounds(&self, width_px: u32, height_px: u32) -> BoundingBox {
        let zoom = self.zoom.min(Self::MAX_ZOOM);
        let degrees_per_px = 360.0 / (256.0 * f64::from(1u32 << zoom));
        let half_w = degrees_per_px * f64::from(width_px) / 2.0;
        let half_h = degrees_per_px * f64::from(height_px) / 2.0;
        BoundingBox::new(
            (self.center.lon - half_w).max(-180.0),
            (self.center.lat - half_h).max(-90.0),
            (self.center.lon + half_w).min(180.0),
            (self.center.lat + half_h).min(90.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(GeoPoint::new(20.0, 0.0), 3)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}
