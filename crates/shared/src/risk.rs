//! Risk-score bucketing and the default color/label strategies.
//!
//! One canonical scheme: Low < 25 <= Moderate < 45 <= High < 70 <= Severe.

use crate::models::DataPoint;

pub const MODERATE_THRESHOLD: f64 = 25.0;
pub const HIGH_THRESHOLD: f64 = 45.0;
pub const SEVERE_THRESHOLD: f64 = 70.0;

pub const GREEN: &str = "#22c55e";
pub const YELLOW: &str = "#eab308";
pub const ORANGE: &str = "#f97316";
pub const RED: &str = "#ef4444";

/// Halo radius at score 0 and the extra pixels gained at score 100.
const HALO_BASE_PX: f64 = 18.0;
const HALO_SPAN_PX: f64 = 42.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBucket {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskBucket {
    pub const ALL: [RiskBucket; 4] = [
        RiskBucket::Low,
        RiskBucket::Moderate,
        RiskBucket::High,
        RiskBucket::Severe,
    ];

    pub fn from_score(score: f64) -> Self {
        let score = clamp_score(score);
        if score >= SEVERE_THRESHOLD {
            RiskBucket::Severe
        } else if score >= HIGH_THRESHOLD {
            RiskBucket::High
        } else if score >= MODERATE_THRESHOLD {
            RiskBucket::Moderate
        } else {
            RiskBucket::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskBucket::Low => GREEN,
            RiskBucket::Moderate => YELLOW,
            RiskBucket::High => ORANGE,
            RiskBucket::Severe => RED,
        }
    }

    /// The `riskClass` string carried by data points.
    pub fn class_name(self) -> &'static str {
        match self {
            RiskBucket::Low => "low",
            RiskBucket::Moderate => "moderate",
            RiskBucket::High => "high",
            RiskBucket::Severe => "severe",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBucket::Low => "Low Risk",
            RiskBucket::Moderate => "Moderate Risk",
            RiskBucket::High => "High Risk",
            RiskBucket::Severe => "Severe Risk",
        }
    }

    /// A score that falls inside this bucket, for legends.
    pub fn representative_score(self) -> f64 {
        match self {
            RiskBucket::Low => 0.0,
            RiskBucket::Moderate => MODERATE_THRESHOLD,
            RiskBucket::High => HIGH_THRESHOLD,
            RiskBucket::Severe => SEVERE_THRESHOLD,
        }
    }

    /// Human-readable score span, e.g. `"25–44"`.
    pub fn range_label(self) -> &'static str {
        match self {
            RiskBucket::Low => "0\u{2013}24",
            RiskBucket::Moderate => "25\u{2013}44",
            RiskBucket::High => "45\u{2013}69",
            RiskBucket::Severe => "70\u{2013}100",
        }
    }

    pub fn from_class_name(class: &str) -> Option<Self> {
        let class = class.trim();
        RiskBucket::ALL
            .into_iter()
            .find(|b| b.class_name().eq_ignore_ascii_case(class))
    }
}

/// Number of points per bucket, indexed like `RiskBucket::ALL`.
pub fn bucket_counts(cells: &[DataPoint]) -> [usize; 4] {
    let mut counts = [0; 4];
    for cell in cells {
        counts[RiskBucket::from_score(cell.risk_score) as usize] += 1;
    }
    counts
}

/// Scores are defined on [0, 100]; NaN counts as 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

pub fn default_risk_color(score: f64) -> String {
    RiskBucket::from_score(score).color().to_string()
}

/// Known classes get their bucket label; anything else is title-cased.
pub fn default_risk_label(risk_class: &str) -> String {
    if let Some(bucket) = RiskBucket::from_class_name(risk_class) {
        return bucket.label().to_string();
    }
    risk_class
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Marker radius grows linearly with score and stays within `[min_px, max_px]`.
pub fn marker_radius(score: f64, min_px: f64, max_px: f64) -> f64 {
    let t = clamp_score(score) / 100.0;
    (min_px + t * (max_px - min_px)).clamp(min_px, max_px)
}

pub fn halo_radius(score: f64) -> f64 {
    HALO_BASE_PX + clamp_score(score) / 100.0 * HALO_SPAN_PX
}

/// `#rrggbb` to `rgba(r,g,b,alpha)`. Other color syntaxes are returned as-is.
pub fn with_alpha(color: &str, alpha: f64) -> String {
    let hex = color.trim().trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
    if color.trim().starts_with('#') && hex.len() == 6 {
        if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
            let a = alpha.clamp(0.0, 1.0);
            return format!("rgba({r},{g},{b},{a})");
        }
    }
    color.to_string()
}
