use serde::{Deserialize, Serialize};

use crate::domain::{MetricName, MetricRating};

pub const ROMAN_NUMERAL_PATH: &str = "/romannumeral";
pub const METRICS_PATH: &str = "/react-metrics";
pub const QUERY_PARAM: &str = "query";

/// Success body of `GET /romannumeral?query=<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub output: String,
}

/// Body of `POST /react-metrics`, shaped like a web-vitals metric object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSignal {
    pub name: MetricName,
    pub value: f64,
    pub rating: MetricRating,
    pub delta: f64,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_type: Option<String>,
}

impl MetricSignal {
    pub fn new(name: MetricName, value: f64, id: impl Into<String>) -> Self {
        Self {
            name,
            value,
            rating: MetricRating::classify(name, value),
            delta: value,
            id: id.into(),
            navigation_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_signal_uses_web_vitals_field_names() {
        let signal = MetricSignal {
            navigation_type: Some("navigate".to_string()),
            ..MetricSignal::new(MetricName::Ttfb, 42.0, "v1-ttfb")
        };
        let json = serde_json::to_value(&signal).expect("serialize");
        assert_eq!(json["name"], "TTFB");
        assert_eq!(json["rating"], "good");
        assert_eq!(json["navigationType"], "navigate");
        assert_eq!(json["delta"], 42.0);
    }

    #[test]
    fn conversion_response_ignores_extra_fields() {
        let body: ConversionResponse =
            serde_json::from_str(r#"{"input":"10","output":"X"}"#).expect("decode");
        assert_eq!(body.output, "X");
    }
}
