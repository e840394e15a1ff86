//! Fire-and-forget performance signal reporting.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    domain::MetricName,
    protocol::{MetricSignal, METRICS_PATH},
};
use tokio::task::JoinHandle;
use tracing::{error, info};
use url::Url;

use crate::service::{ConversionService, ServiceFailure};

const METRICS_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts signals to `<server>/react-metrics`. Delivery failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct MetricsReporter {
    http: Client,
    endpoint: Url,
}

impl MetricsReporter {
    pub fn new(server_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(METRICS_TIMEOUT)
            .build()
            .context("failed to build metrics http client")?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let endpoint = format!("{}{METRICS_PATH}", server_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("invalid metrics server url '{server_url}'"))?;
        Ok(Self { http, endpoint })
    }

    pub async fn report(&self, signal: &MetricSignal) {
        match self.send(signal).await {
            Ok(()) => info!(
                metric = signal.name.as_str(),
                value = signal.value,
                "metric sent"
            ),
            Err(err) => error!(
                metric = signal.name.as_str(),
                "error sending metric: {err:#}"
            ),
        }
    }

    pub fn spawn_report(&self, signal: MetricSignal) -> JoinHandle<()> {
        let reporter = self.clone();
        tokio::spawn(async move { reporter.report(&signal).await })
    }

    async fn send(&self, signal: &MetricSignal) -> Result<()> {
        self.http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(signal)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Wraps a conversion service and reports a single `TTFB` signal measuring the
/// latency of the first call that got an answer from the server.
pub struct TimedConversionService<S> {
    inner: S,
    reporter: MetricsReporter,
    reported: AtomicBool,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl<S> TimedConversionService<S> {
    pub fn new(inner: S, reporter: MetricsReporter) -> Self {
        Self {
            inner,
            reporter,
            reported: AtomicBool::new(false),
            in_flight: Mutex::new(None),
        }
    }

    /// Waits for a spawned report to finish, if there is one.
    pub async fn flush(&self) {
        let handle = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!("metric report task failed: {err}");
            }
        }
    }
}

#[async_trait]
impl<S: ConversionService> ConversionService for TimedConversionService<S> {
    async fn convert(&self, query: &str) -> Result<String, ServiceFailure> {
        let started = Instant::now();
        let result = self.inner.convert(query).await;
        let answered = !matches!(result, Err(ServiceFailure::Transport(_)));

        if answered && !self.reported.swap(true, Ordering::SeqCst) {
            let millis = started.elapsed().as_secs_f64() * 1000.0;
            let id = format!("v1-ttfb-{}", std::process::id());
            let handle = self
                .reporter
                .spawn_report(MetricSignal::new(MetricName::Ttfb, millis, id));
            *self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        }

        result
    }
}

#[cfg(test)]
#[path = "tests/metrics_tests.rs"]
mod tests;
