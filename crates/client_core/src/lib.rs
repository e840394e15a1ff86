//! Client-side conversion request handling: input validation, the per-panel
//! conversion controller, the remote service seam and metrics reporting.

pub mod controller;
pub mod diagnostics;
pub mod metrics;
pub mod service;
pub mod validation;

pub use controller::{
    CacheEntry, ControllerSnapshot, ConversionController, ErrorInfo, ErrorKind, Outcome,
    RequestState,
};
pub use diagnostics::{DiagnosticsSink, LogLevel, TracingDiagnostics};
pub use metrics::{MetricsReporter, TimedConversionService};
pub use service::{ConversionService, HttpConversionService, ServiceFailure};
pub use validation::{validate, Validation};
