//! Randomized query parameters for STAC search load tests.
//!
//! Bounding boxes are placed uniformly inside an extent; time intervals start
//! at a random day offset from a base date and always fit into one year.
mod bbox;
mod interval;

#[cfg(test)]
mod tests;

pub use bbox::{BboxParams, BoundingBox, Extent, generate_bboxes, generate_bboxes_with};
pub use interval::{
    INTERVAL_WINDOW_DAYS, IntervalParams, TimeInterval, default_start_date,
    generate_time_intervals, generate_time_intervals_with, parse_start_date,
};
