use super::*;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use shared::domain::MetricRating;
use tokio::{net::TcpListener, sync::mpsc};

#[derive(Clone)]
struct MetricsState {
    tx: mpsc::UnboundedSender<(Option<String>, MetricSignal)>,
}

async fn handle_metric(
    State(state): State<MetricsState>,
    headers: HeaderMap,
    Json(signal): Json<MetricSignal>,
) -> StatusCode {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let _ = state.tx.send((content_type, signal));
    StatusCode::OK
}

async fn spawn_metrics_server(
) -> Result<(String, mpsc::UnboundedReceiver<(Option<String>, MetricSignal)>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route(METRICS_PATH, post(handle_metric))
        .with_state(MetricsState { tx });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

struct FixedService(Result<String, ServiceFailure>);

#[async_trait]
impl ConversionService for FixedService {
    async fn convert(&self, _query: &str) -> Result<String, ServiceFailure> {
        self.0.clone()
    }
}

#[tokio::test]
async fn report_posts_raw_signal_as_json() {
    let (server_url, mut rx) = spawn_metrics_server().await.expect("spawn server");
    let reporter = MetricsReporter::new(&server_url).expect("reporter");
    let signal = MetricSignal::new(MetricName::Lcp, 3100.0, "v1-lcp");

    reporter.report(&signal).await;

    let (content_type, received) = rx.recv().await.expect("metric");
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(received, signal);
    assert_eq!(received.rating, MetricRating::NeedsImprovement);
}

#[tokio::test]
async fn report_swallows_delivery_failures() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let reporter = MetricsReporter::new(&format!("http://{addr}")).expect("reporter");
    reporter
        .spawn_report(MetricSignal::new(MetricName::Cls, 0.02, "v1-cls"))
        .await
        .expect("report task must not panic");
}

#[tokio::test]
async fn timed_service_reports_ttfb_once() {
    let (server_url, mut rx) = spawn_metrics_server().await.expect("spawn server");
    let reporter = MetricsReporter::new(&server_url).expect("reporter");
    let service = TimedConversionService::new(FixedService(Ok("X".to_string())), reporter);

    assert_eq!(service.convert("10").await.expect("convert"), "X");
    service.flush().await;
    assert_eq!(service.convert("10").await.expect("convert"), "X");
    service.flush().await;

    let (_, signal) = rx.recv().await.expect("ttfb metric");
    assert_eq!(signal.name, MetricName::Ttfb);
    assert!(signal.value >= 0.0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err(), "ttfb must only be reported once");
}

#[tokio::test]
async fn timed_service_skips_transport_failures() {
    let (server_url, mut rx) = spawn_metrics_server().await.expect("spawn server");
    let reporter = MetricsReporter::new(&server_url).expect("reporter");
    let service = TimedConversionService::new(
        FixedService(Err(ServiceFailure::Transport("refused".to_string()))),
        reporter,
    );

    service.convert("10").await.expect_err("must fail");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
}
