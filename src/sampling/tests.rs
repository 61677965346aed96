use super::*;
use crate::error::{AppResult, ValidationError};
use chrono::{NaiveDateTime, TimeDelta};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SAMPLE_COUNT: usize = 500;

fn seeded() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

fn parse_timestamp(value: &str) -> AppResult<NaiveDateTime> {
    let trimmed = value
        .strip_suffix('Z')
        .ok_or_else(|| format!("Missing trailing Z: {}", value))?;
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .map_err(|err| format!("Invalid timestamp '{}': {}", value, err).into())
}

#[test]
fn bboxes_stay_inside_default_extent() -> AppResult<()> {
    let params = BboxParams::default();
    let boxes = generate_bboxes_with(&mut seeded(), SAMPLE_COUNT, &params)?;
    if boxes.len() != SAMPLE_COUNT {
        return Err(format!("Unexpected box count: {}", boxes.len()).into());
    }
    let extent = params.extent;
    for bbox in &boxes {
        let inside = extent.min_lon <= bbox.min_lon
            && bbox.min_lon <= bbox.max_lon
            && bbox.max_lon <= extent.max_lon
            && extent.min_lat <= bbox.min_lat
            && bbox.min_lat <= bbox.max_lat
            && bbox.max_lat <= extent.max_lat;
        if !inside {
            return Err(format!("Box escaped extent: {:?}", bbox).into());
        }
        let width = bbox.max_lon - bbox.min_lon;
        if (width - params.width).abs() > 2e-4 {
            return Err(format!("Unexpected box width: {}", width).into());
        }
    }
    Ok(())
}

#[test]
fn bbox_coordinates_are_rounded_to_four_decimals() -> AppResult<()> {
    let boxes = generate_bboxes_with(&mut seeded(), 50, &BboxParams::default())?;
    for bbox in &boxes {
        for value in <[f64; 4]>::from(*bbox) {
            let scaled = value * 10_000.0;
            if (scaled - scaled.round()).abs() > 1e-6 {
                return Err(format!("Coordinate not rounded: {}", value).into());
            }
        }
    }
    Ok(())
}

#[test]
fn bbox_filling_whole_extent_is_pinned() -> AppResult<()> {
    let params = BboxParams {
        extent: Extent::new(0.0, 0.0, 2.0, 1.0),
        width: 2.0,
        height: 1.0,
    };
    let boxes = generate_bboxes_with(&mut seeded(), 5, &params)?;
    for bbox in boxes {
        if <[f64; 4]>::from(bbox) != [0.0, 0.0, 2.0, 1.0] {
            return Err(format!("Unexpected box: {:?}", bbox).into());
        }
    }
    Ok(())
}

#[test]
fn bbox_larger_than_extent_is_rejected() -> AppResult<()> {
    let params = BboxParams {
        extent: Extent::new(0.0, 0.0, 1.0, 1.0),
        width: 2.0,
        height: 0.5,
    };
    match generate_bboxes_with(&mut seeded(), 1, &params) {
        Err(ValidationError::BoxLargerThanExtent { .. }) => Ok(()),
        other => Err(format!("Expected BoxLargerThanExtent, got {:?}", other).into()),
    }
}

#[test]
fn inverted_extent_is_rejected() -> AppResult<()> {
    let params = BboxParams {
        extent: Extent::new(10.0, 0.0, -10.0, 5.0),
        width: 1.0,
        height: 1.0,
    };
    if params.validate().is_ok() {
        return Err("Expected inverted extent to fail".into());
    }
    Ok(())
}

#[test]
fn non_finite_extent_is_rejected() -> AppResult<()> {
    let params = BboxParams {
        extent: Extent::new(f64::NAN, 0.0, 1.0, 1.0),
        width: 0.5,
        height: 0.5,
    };
    match params.validate() {
        Err(ValidationError::ExtentNotFinite) => Ok(()),
        other => Err(format!("Expected ExtentNotFinite, got {:?}", other).into()),
    }
}

#[test]
fn extent_parses_from_comma_list() -> AppResult<()> {
    let extent: Extent = " -10, 35.5,30 ,70".parse()?;
    if <[f64; 4]>::from(extent) != [-10.0, 35.5, 30.0, 70.0] {
        return Err(format!("Unexpected extent: {:?}", extent).into());
    }
    if "1,2,3".parse::<Extent>().is_ok() {
        return Err("Expected three values to fail".into());
    }
    if "a,2,3,4".parse::<Extent>().is_ok() {
        return Err("Expected non-number to fail".into());
    }
    Ok(())
}

#[test]
fn bbox_serializes_as_array() -> AppResult<()> {
    let bbox = BoundingBox::from([1.5, 2.0, 2.5, 3.0]);
    let json = serde_json::to_string(&bbox)?;
    if json != "[1.5,2.0,2.5,3.0]" {
        return Err(format!("Unexpected json: {}", json).into());
    }
    Ok(())
}

#[test]
fn intervals_fit_duration_bounds_and_window() -> AppResult<()> {
    let params = IntervalParams::default();
    let intervals = generate_time_intervals_with(&mut seeded(), SAMPLE_COUNT, &params)?;
    let window_end = params.start_date + TimeDelta::days(i64::from(INTERVAL_WINDOW_DAYS));
    for interval in &intervals {
        let rendered = interval.to_string();
        let (start_text, end_text) = rendered
            .split_once('/')
            .ok_or_else(|| format!("Missing separator: {}", rendered))?;
        let start = parse_timestamp(start_text)?;
        let end = parse_timestamp(end_text)?;
        if start >= end {
            return Err(format!("Start not before end: {}", rendered).into());
        }
        let days = end.signed_duration_since(start).num_days();
        if days < i64::from(params.min_duration_days) || days > i64::from(params.max_duration_days)
        {
            return Err(format!("Duration out of range: {}", rendered).into());
        }
        if start < params.start_date || end > window_end {
            return Err(format!("Interval outside window: {}", rendered).into());
        }
    }
    Ok(())
}

#[test]
fn interval_renders_with_literal_zulu_suffix() -> AppResult<()> {
    let start = parse_start_date("2018-02-12")?;
    let end = parse_start_date("2018-03-18T12:31:12")?;
    let interval = TimeInterval { start, end };
    let rendered = interval.to_string();
    if rendered != "2018-02-12T00:00:00Z/2018-03-18T12:31:12Z" {
        return Err(format!("Unexpected interval: {}", rendered).into());
    }
    let json = serde_json::to_string(&interval)?;
    if json != "\"2018-02-12T00:00:00Z/2018-03-18T12:31:12Z\"" {
        return Err(format!("Unexpected json: {}", json).into());
    }
    Ok(())
}

#[test]
fn fixed_duration_intervals_have_exact_length() -> AppResult<()> {
    let params = IntervalParams {
        min_duration_days: 7,
        max_duration_days: 7,
        ..IntervalParams::default()
    };
    let intervals = generate_time_intervals_with(&mut seeded(), 20, &params)?;
    if intervals
        .iter()
        .any(|interval| interval.duration() != TimeDelta::days(7))
    {
        return Err("Expected every interval to last 7 days".into());
    }
    Ok(())
}

#[test]
fn zero_minimum_duration_is_rejected() -> AppResult<()> {
    let params = IntervalParams {
        min_duration_days: 0,
        max_duration_days: 0,
        ..IntervalParams::default()
    };
    match generate_time_intervals_with(&mut seeded(), 3, &params) {
        Err(ValidationError::MinDurationZero) => Ok(()),
        other => Err(format!("Expected MinDurationZero, got {:?}", other).into()),
    }
}

#[test]
fn one_day_intervals_keep_start_before_end() -> AppResult<()> {
    let params = IntervalParams {
        min_duration_days: 1,
        max_duration_days: 1,
        ..IntervalParams::default()
    };
    for interval in generate_time_intervals_with(&mut seeded(), SAMPLE_COUNT, &params)? {
        if interval.start >= interval.end {
            return Err(format!("Start not before end: {}", interval).into());
        }
    }
    Ok(())
}

#[test]
fn huge_count_does_not_preallocate() -> AppResult<()> {
    let params = IntervalParams {
        start_date: NaiveDateTime::MAX,
        min_duration_days: 1,
        max_duration_days: 1,
    };
    match generate_time_intervals_with(&mut seeded(), usize::MAX, &params) {
        Err(ValidationError::DateOutOfRange { .. }) => Ok(()),
        other => Err(format!(
            "Expected DateOutOfRange, got {:?}",
            other.map(|intervals| intervals.len())
        )
        .into()),
    }
}

#[test]
fn invalid_duration_bounds_are_rejected() -> AppResult<()> {
    let inverted = IntervalParams {
        min_duration_days: 10,
        max_duration_days: 5,
        ..IntervalParams::default()
    };
    if !matches!(
        inverted.validate(),
        Err(ValidationError::DurationRangeInverted { min: 10, max: 5 })
    ) {
        return Err("Expected DurationRangeInverted".into());
    }
    let too_long = IntervalParams {
        min_duration_days: 5,
        max_duration_days: 400,
        ..IntervalParams::default()
    };
    if !matches!(
        too_long.validate(),
        Err(ValidationError::DurationExceedsWindow { .. })
    ) {
        return Err("Expected DurationExceedsWindow".into());
    }
    Ok(())
}

#[test]
fn zero_count_yields_no_samples() -> AppResult<()> {
    if !generate_bboxes(0, &BboxParams::default())?.is_empty() {
        return Err("Expected no boxes".into());
    }
    if !generate_time_intervals(0, &IntervalParams::default())?.is_empty() {
        return Err("Expected no intervals".into());
    }
    Ok(())
}

#[test]
fn start_date_parsing_accepts_date_and_datetime() -> AppResult<()> {
    let date = parse_start_date("2024-11-01")?;
    if date != default_start_date() {
        return Err(format!("Unexpected date: {}", date).into());
    }
    if parse_start_date("01/11/2024").is_ok() {
        return Err("Expected invalid date to fail".into());
    }
    Ok(())
}
