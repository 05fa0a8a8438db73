//! Score classification: pure mappings from raw control scores (0-5) and
//! category percentages (0-100) to priority tiers and maturity labels.
//!
//! No I/O here; everything downstream (catalog lookups, prompt text, event
//! payloads) keys off these functions, so the thresholds live in one place.

use serde::Serialize;

use crate::models::survey::CategoryScores;

/// Highest control score that still gets remediation guidance. Controls
/// scoring above this are considered healthy and are skipped.
pub const REMEDIATION_SCORE_CEILING: i64 = 2;

/// Remediation priority tier for an assessed control or category.
///
/// Serializes as its display string ("Critical", "High", ...), the wire
/// format clients already consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Classifies a raw control score: 0-1 Critical, 2 High, 3 Medium,
    /// 4 and up Low.
    pub fn from_score(score: i64) -> Self {
        if score <= 1 {
            Priority::Critical
        } else if score == 2 {
            Priority::High
        } else if score == 3 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Classifies a category maturity percentage: 0-25 Critical, 26-50 High,
    /// 51-75 Medium, 76-100 Low.
    pub fn from_percentage(percentage: i64) -> Self {
        if percentage <= 25 {
            Priority::Critical
        } else if percentage <= 50 {
            Priority::High
        } else if percentage <= 75 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Maturity band index (0 = Critical .. 3 = Low) keying the static
    /// guidance tables.
    pub fn bucket(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive text for each rung of the 0-5 score ladder.
pub fn score_description(score: i64) -> &'static str {
    match score {
        0 => "Incomplete. No formal practices exist.",
        1 => "Ad hoc. Unstructured, reactive practices exist.",
        2 => "Developing. Some policies and controls exist, but they are incomplete, inconsistent, or not widely followed.",
        3 => "Managed. Policies and processes are documented, followed, and managed across teams, but effectiveness is not consistently measured.",
        4 => "Quantified. Policies and controls are regularly measured and continuously improved. The organization has a structured cybersecurity approach.",
        5 => "Optimized. Cybersecurity is fully integrated into business operations, continuously improving, and leveraging automation and advanced security practices.",
        _ => "Unknown score level",
    }
}

/// Overall maturity label from the average category percentage.
/// No scores at all means nothing can be said, so "Unknown".
pub fn overall_maturity(scores: &CategoryScores) -> &'static str {
    if scores.is_empty() {
        return "Unknown";
    }

    let avg = scores.values().sum::<i64>() as f64 / scores.len() as f64;

    if avg >= 76.0 {
        "Advanced"
    } else if avg >= 51.0 {
        "Intermediate"
    } else if avg >= 26.0 {
        "Basic"
    } else {
        "Initial"
    }
}

/// One-sentence posture summary from the average category percentage.
pub fn summary_insight(scores: &CategoryScores) -> &'static str {
    if scores.is_empty() {
        return "No scores available to analyze.";
    }

    let avg = scores.values().sum::<i64>() as f64 / scores.len() as f64;

    if avg >= 76.0 {
        "Organization demonstrates strong cybersecurity practices across all categories."
    } else if avg >= 51.0 {
        "Organization shows moderate cybersecurity implementation with some areas needing improvement."
    } else if avg >= 26.0 {
        "Organization has basic cybersecurity measures in place but requires significant improvements."
    } else {
        "Organization lacks comprehensive cybersecurity implementation across all categories."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, i64)]) -> CategoryScores {
        pairs
            .iter()
            .map(|(name, pct)| (name.to_string(), *pct))
            .collect()
    }

    #[test]
    fn test_priority_from_score_bands() {
        assert_eq!(Priority::from_score(0), Priority::Critical);
        assert_eq!(Priority::from_score(1), Priority::Critical);
        assert_eq!(Priority::from_score(2), Priority::High);
        assert_eq!(Priority::from_score(3), Priority::Medium);
        assert_eq!(Priority::from_score(4), Priority::Low);
        assert_eq!(Priority::from_score(5), Priority::Low);
    }

    #[test]
    fn test_priority_from_percentage_bands() {
        assert_eq!(Priority::from_percentage(0), Priority::Critical);
        assert_eq!(Priority::from_percentage(1), Priority::Critical);
        assert_eq!(Priority::from_percentage(25), Priority::Critical);
        assert_eq!(Priority::from_percentage(26), Priority::High);
        assert_eq!(Priority::from_percentage(50), Priority::High);
        assert_eq!(Priority::from_percentage(51), Priority::Medium);
        assert_eq!(Priority::from_percentage(75), Priority::Medium);
        assert_eq!(Priority::from_percentage(76), Priority::Low);
        assert_eq!(Priority::from_percentage(100), Priority::Low);
    }

    #[test]
    fn test_priority_buckets_cover_all_tiers() {
        assert_eq!(Priority::Critical.bucket(), 0);
        assert_eq!(Priority::High.bucket(), 1);
        assert_eq!(Priority::Medium.bucket(), 2);
        assert_eq!(Priority::Low.bucket(), 3);
    }

    #[test]
    fn test_priority_serializes_as_display_string() {
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"Critical\""
        );
        assert_eq!(Priority::High.to_string(), "High");
    }

    #[test]
    fn test_score_description_ladder() {
        assert!(score_description(0).starts_with("Incomplete."));
        assert!(score_description(1).starts_with("Ad hoc."));
        assert!(score_description(2).starts_with("Developing."));
        assert!(score_description(3).starts_with("Managed."));
        assert!(score_description(4).starts_with("Quantified."));
        assert!(score_description(5).starts_with("Optimized."));
        assert_eq!(score_description(6), "Unknown score level");
        assert_eq!(score_description(-1), "Unknown score level");
    }

    #[test]
    fn test_overall_maturity_empty_is_unknown() {
        assert_eq!(overall_maturity(&CategoryScores::new()), "Unknown");
    }

    #[test]
    fn test_overall_maturity_bands() {
        // Average exactly 50 sits in the Basic band (26..=50)
        assert_eq!(overall_maturity(&scores(&[("a", 90), ("b", 10)])), "Basic");
        assert_eq!(overall_maturity(&scores(&[("a", 25)])), "Initial");
        assert_eq!(overall_maturity(&scores(&[("a", 26)])), "Basic");
        assert_eq!(overall_maturity(&scores(&[("a", 51)])), "Intermediate");
        assert_eq!(overall_maturity(&scores(&[("a", 75)])), "Intermediate");
        assert_eq!(overall_maturity(&scores(&[("a", 76)])), "Advanced");
        assert_eq!(
            overall_maturity(&scores(&[("a", 80), ("b", 90), ("c", 70)])),
            "Advanced"
        );
    }

    #[test]
    fn test_summary_insight_bands() {
        assert_eq!(
            summary_insight(&CategoryScores::new()),
            "No scores available to analyze."
        );
        assert!(summary_insight(&scores(&[("a", 90)])).contains("strong"));
        assert!(summary_insight(&scores(&[("a", 60)])).contains("moderate"));
        assert!(summary_insight(&scores(&[("a", 30)])).contains("basic"));
        assert!(summary_insight(&scores(&[("a", 10)])).contains("lacks"));
    }
}
