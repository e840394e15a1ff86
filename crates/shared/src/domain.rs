use serde::{Deserialize, Serialize};

/// Smallest value the conversion service accepts.
pub const MIN_CONVERTIBLE: u32 = 1;
/// Largest value the conversion service accepts.
pub const MAX_CONVERTIBLE: u32 = 3999;

pub fn is_convertible(value: u32) -> bool {
    (MIN_CONVERTIBLE..=MAX_CONVERTIBLE).contains(&value)
}

/// Web performance signals forwarded to the metrics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Cls,
    Lcp,
    Fcp,
    Ttfb,
}

impl MetricName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cls => "CLS",
            Self::Lcp => "LCP",
            Self::Fcp => "FCP",
            Self::Ttfb => "TTFB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricRating {
    Good,
    NeedsImprovement,
    Poor,
}

impl MetricRating {
    /// Rates a signal against the standard web-vitals thresholds.
    pub fn classify(name: MetricName, value: f64) -> Self {
        let (good, poor) = match name {
            MetricName::Cls => (0.1, 0.25),
            MetricName::Lcp => (2500.0, 4000.0),
            MetricName::Fcp => (1800.0, 3000.0),
            MetricName::Ttfb => (800.0, 1800.0),
        };
        if value <= good {
            Self::Good
        } else if value <= poor {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convertible_bounds_are_inclusive() {
        assert!(!is_convertible(0));
        assert!(is_convertible(1));
        assert!(is_convertible(3999));
        assert!(!is_convertible(4000));
    }

    #[test]
    fn ttfb_thresholds_match_web_vitals() {
        assert_eq!(
            MetricRating::classify(MetricName::Ttfb, 120.0),
            MetricRating::Good
        );
        assert_eq!(
            MetricRating::classify(MetricName::Ttfb, 1000.0),
            MetricRating::NeedsImprovement
        );
        assert_eq!(
            MetricRating::classify(MetricName::Ttfb, 2500.0),
            MetricRating::Poor
        );
    }
}
