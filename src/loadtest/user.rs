use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

use crate::args::LimitRange;
use crate::error::ValidationError;
use crate::sampling::{
    BboxParams, BoundingBox, IntervalParams, TimeInterval, generate_bboxes_with,
    generate_time_intervals_with,
};
use crate::shutdown::ShutdownReceiver;

use super::request::{RequestRecord, SearchRequest, execute_search};

/// Inclusive range of think times between two requests of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitRange {
    pub min: Duration,
    pub max: Duration,
}

impl WaitRange {
    /// # Errors
    ///
    /// Returns an error when `min > max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::WaitRangeInverted {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn sample<R>(&self, rng: &mut R) -> Duration
    where
        R: Rng + ?Sized,
    {
        rng.gen_range(self.min..=self.max)
    }
}

/// Boxes and intervals a user draws its queries from.
#[derive(Debug, Clone)]
pub struct QueryPool {
    bboxes: Vec<BoundingBox>,
    intervals: Vec<TimeInterval>,
}

impl QueryPool {
    /// # Errors
    ///
    /// Returns an error when `samples` is zero or the generator rejects its
    /// parameters.
    pub fn generate<R>(
        rng: &mut R,
        samples: usize,
        bbox: &BboxParams,
        interval: &IntervalParams,
    ) -> Result<Self, ValidationError>
    where
        R: Rng + ?Sized,
    {
        if samples == 0 {
            return Err(ValidationError::EmptySamplePool);
        }
        Ok(Self {
            bboxes: generate_bboxes_with(rng, samples, bbox)?,
            intervals: generate_time_intervals_with(rng, samples, interval)?,
        })
    }

    /// Picks a random box, limit and interval.
    pub fn next_request<R>(&self, rng: &mut R, limits: LimitRange) -> Option<SearchRequest>
    where
        R: Rng + ?Sized,
    {
        let bbox = *self.bboxes.choose(rng)?;
        let limit = rng.gen_range(limits.as_range());
        let datetime = *self.intervals.choose(rng)?;
        Some(SearchRequest {
            bbox,
            datetime,
            limit,
        })
    }
}

/// State shared by every simulated user.
#[derive(Debug)]
pub struct UserContext {
    pub client: Client,
    pub search_url: Url,
    pub bbox: BboxParams,
    pub interval: IntervalParams,
    pub samples: usize,
    pub limits: LimitRange,
    pub wait: WaitRange,
}

/// Issues searches until shutdown, sending each outcome to the collector.
pub async fn run_user(
    ctx: Arc<UserContext>,
    user_id: usize,
    mut shutdown_rx: ShutdownReceiver,
    results_tx: mpsc::Sender<RequestRecord>,
) {
    let mut rng = StdRng::from_entropy();
    let pool = match QueryPool::generate(&mut rng, ctx.samples, &ctx.bbox, &ctx.interval) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!("User {} failed to generate queries: {}", user_id, err);
            return;
        }
    };
    debug!("User {} started", user_id);

    loop {
        let Some(request) = pool.next_request(&mut rng, ctx.limits) else {
            break;
        };
        let record = tokio::select! {
            _ = shutdown_rx.recv() => break,
            record = execute_search(&ctx.client, &ctx.search_url, &request) => record,
        };
        if results_tx.send(record).await.is_err() {
            break;
        }

        let wait = ctx.wait.sample(&mut rng);
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            () = tokio::time::sleep(wait) => {}
        }
    }
    debug!("User {} stopped", user_id);
}
