use thiserror::Error;

#[derive(Debug, Error, Clone, Copy)]
pub enum ExtentAxis {
    #[error("longitude")]
    Longitude,
    #[error("latitude")]
    Latitude,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Extent values must be finite numbers.")]
    ExtentNotFinite,
    #[error("Box {axis} size {size} does not fit into the extent span {span}.")]
    BoxLargerThanExtent {
        axis: ExtentAxis,
        size: f64,
        span: f64,
    },
    #[error("Box {axis} size must be >= 0, got {size}.")]
    NegativeBoxSize { axis: ExtentAxis, size: f64 },
    #[error("Invalid extent '{value}'. Expected 'min_lon,min_lat,max_lon,max_lat'.")]
    InvalidExtentFormat { value: String },
    #[error("Invalid extent coordinate '{value}': {source}")]
    InvalidExtentNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Minimum duration must be >= 1 day.")]
    MinDurationZero,
    #[error("Minimum duration ({min} days) must be <= maximum duration ({max} days).")]
    DurationRangeInverted { min: u32, max: u32 },
    #[error("Maximum duration ({max} days) must fit into a {window}-day window.")]
    DurationExceedsWindow { max: u32, window: u32 },
    #[error("Invalid date '{value}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS.")]
    InvalidDate { value: String },
    #[error("Date '{value}' plus {days} days is out of range.")]
    DateOutOfRange { value: String, days: u32 },
    #[error("Minimum wait ({min_ms}ms) must be <= maximum wait ({max_ms}ms).")]
    WaitRangeInverted { min_ms: u128, max_ms: u128 },
    #[error("Sample pool size must be >= 1.")]
    EmptySamplePool,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid range '{value}'. Expected 'min-max'.")]
    InvalidRangeFormat { value: String },
    #[error("Range start must be <= range end.")]
    RangeStartAfterEnd,
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid URL '{url}'. Expected an http(s) URL with a host.")]
    UnsupportedUrl { url: String },
    #[error("Provided file '{path}' is not supported. Please provide a locust.io _stats.csv file.")]
    UnsupportedStatsFile { path: String },
    #[error("Provided file '{path}' is not supported. Please provide a .csv file.")]
    UnsupportedCsvPath { path: String },
    #[error("Missing {what} (set {flag} or {env}).")]
    MissingCredential {
        what: &'static str,
        flag: &'static str,
        env: &'static str,
    },
    #[error("Missing {what} (set {flag} or provide it in config).")]
    MissingValue {
        what: &'static str,
        flag: &'static str,
    },
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
