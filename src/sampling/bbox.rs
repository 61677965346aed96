use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ExtentAxis, ValidationError};

use super::interval::MAX_PREALLOCATED_SAMPLES;

/// Scale used to round coordinates to four decimal digits.
const COORDINATE_SCALE: f64 = 10_000.0;

/// Outer rectangle that every sampled bounding box must fit into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    #[must_use]
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Europe, the default sampling area.
    pub const EUROPE: Self = Self::new(-10.0, 35.0, 30.0, 70.0);

    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::EUROPE
    }
}

impl From<[f64; 4]> for Extent {
    fn from(value: [f64; 4]) -> Self {
        let [min_lon, min_lat, max_lon, max_lat] = value;
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }
}

impl From<Extent> for [f64; 4] {
    fn from(value: Extent) -> Self {
        [value.min_lon, value.min_lat, value.max_lon, value.max_lat]
    }
}

impl FromStr for Extent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [min_lon, min_lat, max_lon, max_lat] = parts.as_slice() else {
            return Err(ValidationError::InvalidExtentFormat {
                value: s.to_owned(),
            });
        };
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|err| ValidationError::InvalidExtentNumber {
                    value: value.to_owned(),
                    source: err,
                })
        };
        Ok(Self::new(
            parse(min_lon)?,
            parse(min_lat)?,
            parse(max_lon)?,
            parse(max_lat)?,
        ))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Fixed-size box placed inside an extent. Serializes as
/// `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from(value: [f64; 4]) -> Self {
        let [min_lon, min_lat, max_lon, max_lat] = value;
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(value: BoundingBox) -> Self {
        [value.min_lon, value.min_lat, value.max_lon, value.max_lat]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BboxParams {
    pub extent: Extent,
    pub width: f64,
    pub height: f64,
}

impl Default for BboxParams {
    fn default() -> Self {
        Self {
            extent: Extent::EUROPE,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl BboxParams {
    /// Checks that a box of the configured size fits into the extent.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite values, negative sizes, or a box that is
    /// wider or taller than the extent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let extent = &self.extent;
        let values = [
            extent.min_lon,
            extent.min_lat,
            extent.max_lon,
            extent.max_lat,
            extent.lon_span(),
            extent.lat_span(),
            self.width,
            self.height,
        ];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ValidationError::ExtentNotFinite);
        }
        check_axis(ExtentAxis::Longitude, self.width, extent.lon_span())?;
        check_axis(ExtentAxis::Latitude, self.height, extent.lat_span())
    }
}

fn check_axis(axis: ExtentAxis, size: f64, span: f64) -> Result<(), ValidationError> {
    if size < 0.0 {
        return Err(ValidationError::NegativeBoxSize { axis, size });
    }
    if size > span {
        return Err(ValidationError::BoxLargerThanExtent { axis, size, span });
    }
    Ok(())
}

fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// Generates `count` boxes of `params.width` x `params.height`, each placed
/// uniformly inside `params.extent`.
///
/// Coordinates are rounded to four decimals and kept inside the extent.
///
/// # Errors
///
/// Returns an error when the box cannot fit into the extent.
pub fn generate_bboxes_with<R>(
    rng: &mut R,
    count: usize,
    params: &BboxParams,
) -> Result<Vec<BoundingBox>, ValidationError>
where
    R: Rng + ?Sized,
{
    params.validate()?;
    let extent = params.extent;
    let lon_upper = extent.max_lon - params.width;
    let lat_upper = extent.max_lat - params.height;

    let mut boxes = Vec::with_capacity(count.min(MAX_PREALLOCATED_SAMPLES));
    for _ in 0..count {
        let lon = rng.gen_range(extent.min_lon..=lon_upper);
        let lat = rng.gen_range(extent.min_lat..=lat_upper);
        boxes.push(BoundingBox {
            min_lon: round_coordinate(lon).clamp(extent.min_lon, extent.max_lon),
            min_lat: round_coordinate(lat).clamp(extent.min_lat, extent.max_lat),
            max_lon: round_coordinate(lon + params.width).clamp(extent.min_lon, extent.max_lon),
            max_lat: round_coordinate(lat + params.height).clamp(extent.min_lat, extent.max_lat),
        });
    }
    Ok(boxes)
}

/// Same as [`generate_bboxes_with`] using the thread-local random source.
///
/// # Errors
///
/// Returns an error when the box cannot fit into the extent.
pub fn generate_bboxes(
    count: usize,
    params: &BboxParams,
) -> Result<Vec<BoundingBox>, ValidationError> {
    generate_bboxes_with(&mut rand::thread_rng(), count, params)
}
