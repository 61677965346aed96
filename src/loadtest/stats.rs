use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::time::Duration;

use hdrhistogram::Histogram;

use crate::error::ExportError;

use super::request::RequestRecord;

/// Percentile columns of the stats table.
pub const PERCENTILES: [(&str, f64); 11] = [
    ("50%", 0.5),
    ("66%", 0.66),
    ("75%", 0.75),
    ("80%", 0.8),
    ("90%", 0.9),
    ("95%", 0.95),
    ("98%", 0.98),
    ("99%", 0.99),
    ("99.9%", 0.999),
    ("99.99%", 0.9999),
    ("100%", 1.0),
];

/// Counters and latency histogram of one request type.
///
/// Response times are milliseconds.
#[derive(Debug, Clone)]
pub struct EntryStats {
    histogram: Histogram<u64>,
    pub num_requests: u64,
    pub num_failures: u64,
    total_response_ms: f64,
    min_response_ms: Option<f64>,
    max_response_ms: f64,
    total_content_length: u64,
}

impl EntryStats {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, ExportError> {
        let histogram = Histogram::<u64>::new(3).map_err(|err| ExportError::Histogram {
            reason: err.to_string(),
        })?;
        Ok(Self {
            histogram,
            num_requests: 0,
            num_failures: 0,
            total_response_ms: 0.0,
            min_response_ms: None,
            max_response_ms: 0.0,
            total_content_length: 0,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the latency cannot be recorded.
    pub fn record(
        &mut self,
        response_time: Duration,
        content_length: u64,
        failed: bool,
    ) -> Result<(), ExportError> {
        let millis = response_time.as_secs_f64() * 1000.0;
        self.num_requests = self.num_requests.saturating_add(1);
        if failed {
            self.num_failures = self.num_failures.saturating_add(1);
        }
        self.total_response_ms += millis;
        self.min_response_ms = Some(self.min_response_ms.map_or(millis, |min| min.min(millis)));
        self.max_response_ms = self.max_response_ms.max(millis);
        self.total_content_length = self.total_content_length.saturating_add(content_length);
        self.histogram
            .record(u64::try_from(response_time.as_millis()).unwrap_or(u64::MAX))
            .map_err(|err| ExportError::Histogram {
                reason: err.to_string(),
            })
    }

    #[must_use]
    pub fn avg_response_ms(&self) -> f64 {
        if self.num_requests == 0 {
            return 0.0;
        }
        self.total_response_ms / self.num_requests as f64
    }

    #[must_use]
    pub fn min_response_ms(&self) -> f64 {
        self.min_response_ms.unwrap_or_default()
    }

    #[must_use]
    pub const fn max_response_ms(&self) -> f64 {
        self.max_response_ms
    }

    #[must_use]
    pub fn avg_content_length(&self) -> f64 {
        if self.num_requests == 0 {
            return 0.0;
        }
        self.total_content_length as f64 / self.num_requests as f64
    }

    /// Latency at `quantile` in milliseconds, `None` before the first request.
    #[must_use]
    pub fn percentile(&self, quantile: f64) -> Option<u64> {
        if self.num_requests == 0 {
            return None;
        }
        Some(self.histogram.value_at_quantile(quantile))
    }

    #[must_use]
    pub fn median_response_ms(&self) -> u64 {
        self.percentile(0.5).unwrap_or_default()
    }

    #[must_use]
    pub fn requests_per_second(&self, elapsed: Duration) -> f64 {
        per_second(self.num_requests, elapsed)
    }

    #[must_use]
    pub fn failures_per_second(&self, elapsed: Duration) -> f64 {
        per_second(self.num_failures, elapsed)
    }

    #[must_use]
    pub fn failure_ratio(&self) -> f64 {
        if self.num_requests == 0 {
            return 0.0;
        }
        self.num_failures as f64 / self.num_requests as f64
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }
    count as f64 / seconds
}

/// Key of a failure occurrence: method, name and message.
pub type FailureKey = (String, String, String);

/// Statistics of a whole run, keyed by `(name, method)`.
#[derive(Debug, Clone)]
pub struct RunStats {
    entries: BTreeMap<(String, String), EntryStats>,
    total: EntryStats,
    failures: BTreeMap<FailureKey, u64>,
}

impl RunStats {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, ExportError> {
        Ok(Self {
            entries: BTreeMap::new(),
            total: EntryStats::new()?,
            failures: BTreeMap::new(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the latency cannot be recorded.
    pub fn record(&mut self, record: &RequestRecord) -> Result<(), ExportError> {
        let key = (record.name.to_owned(), record.method.to_owned());
        let entry = match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(EntryStats::new()?),
        };
        let failed = record.is_failure();
        entry.record(record.response_time, record.content_length, failed)?;
        self.total
            .record(record.response_time, record.content_length, failed)?;

        if let Some(error) = record.error.as_ref() {
            let key = (
                record.method.to_owned(),
                record.name.to_owned(),
                error.clone(),
            );
            let occurrences = self.failures.entry(key).or_insert(0);
            *occurrences = occurrences.saturating_add(1);
        }
        Ok(())
    }

    /// Per-request-type entries as `(method, name, stats)`, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &EntryStats)> {
        self.entries
            .iter()
            .map(|((name, method), stats)| (method.as_str(), name.as_str(), stats))
    }

    #[must_use]
    pub const fn total(&self) -> &EntryStats {
        &self.total
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FailureKey, u64)> {
        self.failures.iter().map(|(key, count)| (key, *count))
    }
}
