//! CPU profiling endpoint.
//!
//! `GET /debug/pprof/profile?seconds=N` samples the process for `N` seconds
//! (30 when absent or not a positive integer) and answers with a flamegraph.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use shared::ServiceError;
use tracing::info;

use super::error::ApiError;

pub const DEFAULT_PROFILE_SECONDS: u64 = 30;

/// Sampling frequency in Hz.
#[cfg(unix)]
const PROFILE_FREQUENCY: i32 = 100;

/// Profiler settings taken from the server configuration.
#[derive(Debug, Clone, Default)]
pub struct ProfileConfig {
    /// A profile must finish before the write timeout cuts the response off
    pub write_timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    seconds: Option<String>,
}

impl ProfileParams {
    fn duration(&self) -> Duration {
        let seconds = self
            .seconds
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_PROFILE_SECONDS);
        Duration::from_secs(seconds)
    }
}

/// Profile the whole process and return an SVG flamegraph
pub async fn get_profile(
    State(config): State<ProfileConfig>,
    Query(params): Query<ProfileParams>,
) -> Result<impl IntoResponse, ApiError> {
    let duration = params.duration();
    info!("GET {} for {:?}", super::PROFILE_PATH, duration);

    if let Some(write_timeout) = config.write_timeout {
        if duration >= write_timeout {
            return Err(ServiceError::bad_request(
                "profile duration exceeds server's WriteTimeout",
            )
            .into());
        }
    }

    let svg = tokio::task::spawn_blocking(move || record_flamegraph(duration))
        .await
        .map_err(anyhow::Error::from)??;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

#[cfg(unix)]
fn record_flamegraph(duration: Duration) -> Result<Vec<u8>, ApiError> {
    use anyhow::Context as _;

    let guard = pprof::ProfilerGuardBuilder::default()
        .frequency(PROFILE_FREQUENCY)
        .blocklist(&["libc", "libgcc", "pthread", "vdso"])
        .build()
        .context("could not enable CPU profiling")?;

    std::thread::sleep(duration);

    let report = guard.report().build().context("failed to build profile report")?;
    let mut svg = Vec::new();
    report
        .flamegraph(&mut svg)
        .context("failed to render flamegraph")?;
    Ok(svg)
}

#[cfg(not(unix))]
fn record_flamegraph(_duration: Duration) -> Result<Vec<u8>, ApiError> {
    Err(ServiceError::from_status(501, "CPU profiling is not supported on this platform").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seconds: Option<&str>) -> ProfileParams {
        ProfileParams {
            seconds: seconds.map(str::to_string),
        }
    }

    #[test]
    fn test_duration_defaults_to_thirty_seconds() {
        assert_eq!(params(None).duration(), Duration::from_secs(30));
        assert_eq!(params(Some("0")).duration(), Duration::from_secs(30));
        assert_eq!(params(Some("-3")).duration(), Duration::from_secs(30));
        assert_eq!(params(Some("soon")).duration(), Duration::from_secs(30));
        assert_eq!(params(Some("2")).duration(), Duration::from_secs(2));
    }
}
