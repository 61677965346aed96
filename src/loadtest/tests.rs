use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::StatusCode;
use tempfile::tempdir;

use super::*;
use crate::args::LimitRange;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::build_client;
use crate::sampling::{BboxParams, Extent, IntervalParams};
use crate::shutdown::shutdown_channel;

fn record(millis: u64, error: Option<&str>) -> RequestRecord {
    RequestRecord {
        method: SEARCH_METHOD,
        name: SEARCH_NAME,
        response_time: Duration::from_millis(millis),
        content_length: 100,
        error: error.map(str::to_owned),
    }
}

/// Answers every request with `body` until the process exits.
fn spawn_search_server(body: &'static str) -> AppResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else {
                continue;
            };
            thread::spawn(move || {
                let mut reader = BufReader::new(stream);
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:")
                    {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
                let mut request_body = vec![0u8; content_length];
                if reader.read_exact(&mut request_body).is_err() {
                    return;
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let mut stream = reader.into_inner();
                drop(stream.write_all(response.as_bytes()));
            });
        }
    });
    Ok(format!("http://{}", addr))
}

#[test]
fn response_check_requires_features() -> Result<(), String> {
    let checks = [
        (StatusCode::OK, r#"{"type":"FeatureCollection","features":[]}"#, None),
        (
            StatusCode::OK,
            r#"{"type":"FeatureCollection"}"#,
            Some("Missing 'features' in response"),
        ),
        (StatusCode::INTERNAL_SERVER_ERROR, "{}", Some("Status code 500")),
        (StatusCode::CREATED, r#"{"features":[]}"#, Some("Status code 201")),
    ];
    for (status, body, expected) in checks {
        let result = check_response(status, body.as_bytes());
        if result.as_deref() != expected {
            return Err(format!("{} {}: got {:?}", status, body, result));
        }
    }
    if check_response(StatusCode::OK, b"not json").is_none() {
        return Err("Expected invalid JSON to fail".to_owned());
    }
    Ok(())
}

#[test]
fn search_request_serializes_as_stac_body() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let pool = QueryPool::generate(
        &mut rng,
        3,
        &BboxParams::default(),
        &IntervalParams::default(),
    )?;
    let request = pool
        .next_request(&mut rng, LimitRange { min: 10, max: 500 })
        .ok_or_else(|| AppError::from("Missing request"))?;
    let value = serde_json::to_value(&request)?;

    let bbox_len = value.get("bbox").and_then(|bbox| bbox.as_array()).map(Vec::len);
    let datetime = value.get("datetime").and_then(|datetime| datetime.as_str());
    let limit = value.get("limit").and_then(serde_json::Value::as_u64);
    if bbox_len != Some(4) {
        return Err(format!("Unexpected bbox: {}", value).into());
    }
    let Some(datetime) = datetime else {
        return Err(format!("Missing datetime: {}", value).into());
    };
    if !datetime.contains("Z/") || !datetime.ends_with('Z') {
        return Err(format!("Unexpected datetime: {}", datetime).into());
    }
    if !limit.is_some_and(|limit| (10..=500).contains(&limit)) {
        return Err(format!("Unexpected limit: {:?}", limit).into());
    }
    Ok(())
}

#[test]
fn pool_draws_limits_from_range() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let pool = QueryPool::generate(
        &mut rng,
        5,
        &BboxParams::default(),
        &IntervalParams::default(),
    )?;
    for _ in 0..200 {
        let request = pool
            .next_request(&mut rng, LimitRange { min: 20, max: 25 })
            .ok_or_else(|| AppError::from("Missing request"))?;
        if !(20..=25).contains(&request.limit) {
            return Err(format!("Limit out of range: {}", request.limit).into());
        }
    }
    Ok(())
}

#[test]
fn empty_pool_is_rejected() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(1);
    match QueryPool::generate(
        &mut rng,
        0,
        &BboxParams::default(),
        &IntervalParams::default(),
    ) {
        Err(ValidationError::EmptySamplePool) => Ok(()),
        other => Err(format!("Expected EmptySamplePool, got {:?}", other).into()),
    }
}

#[test]
fn wait_range_bounds() -> AppResult<()> {
    let range = WaitRange::new(Duration::from_secs(1), Duration::from_secs(3))?;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let wait = range.sample(&mut rng);
        if wait < range.min || wait > range.max {
            return Err(format!("Wait out of range: {:?}", wait).into());
        }
    }
    match WaitRange::new(Duration::from_secs(3), Duration::from_secs(1)) {
        Err(ValidationError::WaitRangeInverted { .. }) => Ok(()),
        other => Err(format!("Expected WaitRangeInverted, got {:?}", other).into()),
    }
}

#[test]
fn zero_wait_range_never_sleeps() -> AppResult<()> {
    let range = WaitRange::new(Duration::ZERO, Duration::ZERO)?;
    let mut rng = StdRng::seed_from_u64(5);
    let wait = range.sample(&mut rng);
    if wait != Duration::ZERO {
        return Err(format!("Expected zero wait, got {:?}", wait).into());
    }
    Ok(())
}

#[test]
fn stats_track_counts_and_failures() -> AppResult<()> {
    let mut stats = RunStats::new()?;
    stats.record(&record(100, None))?;
    stats.record(&record(300, None))?;
    stats.record(&record(200, Some("Status code 500")))?;
    stats.record(&record(50, Some("Status code 500")))?;

    let total = stats.total();
    if total.num_requests != 4 || total.num_failures != 2 {
        return Err(format!(
            "Unexpected counts: {} / {}",
            total.num_requests, total.num_failures
        )
        .into());
    }
    let avg = total.avg_response_ms();
    if (avg - 162.5).abs() > 0.01 {
        return Err(format!("Unexpected average: {}", avg).into());
    }
    if (total.min_response_ms() - 50.0).abs() > 0.01 || (total.max_response_ms() - 300.0).abs() > 0.01
    {
        return Err(format!(
            "Unexpected min/max: {} / {}",
            total.min_response_ms(),
            total.max_response_ms()
        )
        .into());
    }
    let failures: Vec<_> = stats.failures().collect();
    let [((method, name, error), occurrences)] = failures.as_slice() else {
        return Err(format!("Unexpected failures: {:?}", failures).into());
    };
    if method != "POST" || name != "/search" || error != "Status code 500" || *occurrences != 2 {
        return Err(format!("Unexpected failure entry: {:?}", failures).into());
    }
    if stats.entries().count() != 1 {
        return Err("Expected one request type".into());
    }
    Ok(())
}

#[test]
fn stats_csv_has_locust_layout() -> AppResult<()> {
    let mut stats = RunStats::new()?;
    stats.record(&record(120, None))?;
    stats.record(&record(80, Some("Missing 'features' in response")))?;
    let bytes = render_stats_csv(&stats, Duration::from_secs(2), Path::new("run_stats.csv"))?;
    let text = String::from_utf8(bytes).map_err(|err| AppError::from(err.to_string()))?;
    let mut lines = text.lines();

    let header = lines.next().unwrap_or_default();
    let expected_header = "Type,Name,Request Count,Failure Count,Median Response Time,Average Response Time,Min Response Time,Max Response Time,Average Content Size,Requests/s,Failures/s,50%,66%,75%,80%,90%,95%,98%,99%,99.9%,99.99%,100%";
    if header != expected_header {
        return Err(format!("Unexpected header: {}", header).into());
    }
    let search = lines.next().unwrap_or_default();
    if !search.starts_with("POST,/search,2,1,") || !search.contains(",100.00,80.00,120.00,100.00,1.00,0.50,") {
        return Err(format!("Unexpected search row: {}", search).into());
    }
    let aggregated = lines.next().unwrap_or_default();
    if !aggregated.starts_with(",Aggregated,2,1,") {
        return Err(format!("Unexpected aggregated row: {}", aggregated).into());
    }
    Ok(())
}

#[test]
fn empty_run_reports_not_available_percentiles() -> AppResult<()> {
    let stats = RunStats::new()?;
    let bytes = render_stats_csv(&stats, Duration::ZERO, Path::new("empty_stats.csv"))?;
    let text = String::from_utf8(bytes).map_err(|err| AppError::from(err.to_string()))?;
    let aggregated = text.lines().nth(1).unwrap_or_default();
    if !aggregated.starts_with(",Aggregated,0,0,0,0.00,") || !aggregated.ends_with("N/A,N/A") {
        return Err(format!("Unexpected aggregated row: {}", aggregated).into());
    }
    Ok(())
}

#[test]
fn failures_csv_lists_occurrences() -> AppResult<()> {
    let mut stats = RunStats::new()?;
    stats.record(&record(10, Some("Status code 503")))?;
    stats.record(&record(10, Some("Status code 503")))?;
    let bytes = render_failures_csv(&stats, Path::new("run_failures.csv"))?;
    let text = String::from_utf8(bytes).map_err(|err| AppError::from(err.to_string()))?;
    if text != "Method,Name,Error,Occurrences\nPOST,/search,Status code 503,2\n" {
        return Err(format!("Unexpected failures CSV:\n{}", text).into());
    }
    Ok(())
}

#[test]
fn report_paths_use_prefix() -> Result<(), String> {
    let (stats, failures) = report_paths("out/run");
    if stats != Path::new("out/run_stats.csv") || failures != Path::new("out/run_failures.csv") {
        return Err(format!("Unexpected paths: {:?} {:?}", stats, failures));
    }
    Ok(())
}

fn context(host: &str) -> AppResult<UserContext> {
    Ok(UserContext {
        client: build_client(Duration::from_secs(5))?,
        search_url: crate::http::join_url(host, "search")?,
        bbox: BboxParams {
            extent: Extent::new(0.0, 0.0, 10.0, 10.0),
            width: 1.0,
            height: 1.0,
        },
        interval: IntervalParams::default(),
        samples: 2,
        limits: LimitRange::default(),
        wait: WaitRange::new(Duration::from_millis(5), Duration::from_millis(10))?,
    })
}

#[tokio::test]
async fn load_test_collects_successful_searches() -> AppResult<()> {
    let host = spawn_search_server(r#"{"type":"FeatureCollection","features":[]}"#)?;
    let (shutdown_tx, _) = shutdown_channel();
    let stopper = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        drop(stopper.send(()));
    });

    let report = run_load_test(context(&host)?, 2, 100, &shutdown_tx).await?;
    let total = report.stats.total();
    if total.num_requests == 0 {
        return Err("Expected at least one request".into());
    }
    if total.num_failures != 0 {
        return Err(format!("Unexpected failures: {}", total.num_failures).into());
    }
    Ok(())
}

#[tokio::test]
async fn load_test_reports_missing_features() -> AppResult<()> {
    let host = spawn_search_server(r#"{"type":"FeatureCollection"}"#)?;
    let (shutdown_tx, _) = shutdown_channel();
    let stopper = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        drop(stopper.send(()));
    });

    let report = run_load_test(context(&host)?, 1, 1, &shutdown_tx).await?;
    let failures: Vec<_> = report.stats.failures().collect();
    let has_missing = failures
        .iter()
        .any(|((_, _, error), _)| error == "Missing 'features' in response");
    if !has_missing {
        return Err(format!("Unexpected failures: {:?}", failures).into());
    }

    let dir = tempdir()?;
    let prefix = dir.path().join("run");
    let prefix = prefix.to_string_lossy();
    write_reports(&prefix, &report.stats, report.elapsed).await?;
    let (stats_path, failures_path) = report_paths(&prefix);
    if !stats_path.exists() || !failures_path.exists() {
        return Err("Expected both report files".into());
    }
    Ok(())
}
