//! Static NIST CSF guidance tables: category-level remediation texts,
//! per-category resource lists, and curated guidance for known controls.
//!
//! Category lookups key on the maturity band (see [`Priority::bucket`]), so
//! a category at 40% gets the same guidance as one at 30%. Categories and
//! controls missing from the tables fall back to templated generic text
//! rather than failing the lookup.

use crate::scoring::Priority;

/// Category-level remediation text for a given maturity percentage.
pub fn category_recommendation(category: &str, percentage: i64) -> String {
    let band = Priority::from_percentage(percentage).bucket();

    let text = match (category, band) {
        ("govern", 0) => "Implement basic governance framework and policies",
        ("govern", 1) => "Develop formal governance documentation and procedures",
        ("govern", 2) => "Strengthen and formalize existing governance practices",
        ("govern", 3) => "Optimize governance processes and ensure organization-wide adoption",
        ("identify", 0) => "Establish basic asset management and risk assessment processes",
        ("identify", 1) => "Develop comprehensive asset inventory and risk management program",
        ("identify", 2) => "Enhance risk assessment and asset management practices",
        ("identify", 3) => "Implement advanced risk management and asset tracking systems",
        ("protect", 0) => "Implement basic protective measures and controls",
        ("protect", 1) => "Develop comprehensive protection strategies",
        ("protect", 2) => "Enhance existing protection mechanisms",
        ("protect", 3) => "Optimize protection systems and controls",
        ("detect", 0) => "Establish basic detection capabilities and monitoring",
        ("detect", 1) => "Develop comprehensive detection systems",
        ("detect", 2) => "Enhance detection and monitoring capabilities",
        ("detect", 3) => "Implement advanced detection and analytics",
        ("respond", 0) => "Create basic incident response procedures",
        ("respond", 1) => "Develop formal incident response plan",
        ("respond", 2) => "Enhance incident response capabilities",
        ("respond", 3) => "Implement advanced incident response systems",
        ("recover", 0) => "Establish basic recovery procedures",
        ("recover", 1) => "Develop comprehensive recovery plans",
        ("recover", 2) => "Enhance recovery capabilities",
        ("recover", 3) => "Implement advanced recovery systems",
        _ => return format!("Review and improve current {category} practices ({percentage}%)"),
    };

    text.to_string()
}

/// Rationale text paired with [`category_recommendation`].
pub fn category_rationale(category: &str, percentage: i64) -> String {
    let band = Priority::from_percentage(percentage).bucket();

    let text = match (category, band) {
        ("govern", 0) => {
            "No governance framework in place, creating significant compliance and operational risks"
        }
        ("govern", 1) => "Basic governance exists but needs formalization and broader implementation",
        ("govern", 2) => "Governance practices are partially implemented but need strengthening",
        ("govern", 3) => {
            "Strong governance foundation exists, focus on optimization and continuous improvement"
        }
        ("identify", 0) => {
            "Lack of asset management and risk assessment creates blind spots in security posture"
        }
        ("identify", 1) => "Basic identification processes exist but need expansion and formalization",
        ("identify", 2) => "Moderate identification capabilities need enhancement for better coverage",
        ("identify", 3) => "Advanced identification systems in place, focus on optimization",
        ("protect", 0) => "No protective measures in place, leaving systems vulnerable to attacks",
        ("protect", 1) => "Basic protection exists but needs expansion and formalization",
        ("protect", 2) => "Moderate protection capabilities need enhancement",
        ("protect", 3) => "Strong protection systems in place, focus on optimization",
        ("detect", 0) => "No detection capabilities, unable to identify security incidents",
        ("detect", 1) => "Basic detection systems exist but need improvement",
        ("detect", 2) => "Moderate detection capabilities need enhancement",
        ("detect", 3) => "Advanced detection systems in place, focus on optimization",
        ("respond", 0) => {
            "No incident response procedures, unable to handle security incidents effectively"
        }
        ("respond", 1) => "Basic response procedures exist but need formalization",
        ("respond", 2) => "Moderate response capabilities need enhancement",
        ("respond", 3) => "Advanced response systems in place, focus on optimization",
        ("recover", 0) => "No recovery procedures, unable to restore operations after incidents",
        ("recover", 1) => "Basic recovery procedures exist but need formalization",
        ("recover", 2) => "Moderate recovery capabilities need enhancement",
        ("recover", 3) => "Advanced recovery systems in place, focus on optimization",
        _ => {
            return format!(
                "{category} is at {percentage}%; review current practices and identify improvement areas"
            )
        }
    };

    text.to_string()
}

/// Supporting resources for a category; percentage-independent.
pub fn category_resources(category: &str) -> Vec<String> {
    let resources: &[&str] = match category {
        "govern" => &[
            "NIST Governance Framework Template",
            "Policy Implementation Guide",
            "Governance Maturity Assessment Tool",
        ],
        "identify" => &[
            "Asset Management Framework",
            "Risk Assessment Methodology Guide",
            "Critical Asset Identification Template",
        ],
        "protect" => &[
            "Security Control Implementation Guide",
            "Access Control Framework",
            "Data Protection Best Practices",
        ],
        "detect" => &[
            "SIEM Implementation Guide",
            "Log Analysis Best Practices",
            "Threat Detection Framework",
        ],
        "respond" => &[
            "Incident Response Plan Template",
            "Response Playbook",
            "Incident Management Guide",
        ],
        "recover" => &[
            "Business Continuity Planning Guide",
            "Recovery Procedures Framework",
            "Disaster Recovery Template",
        ],
        _ => &["General cybersecurity best practices guide"],
    };

    resources.iter().map(|r| r.to_string()).collect()
}

/// Curated guidance for one control.
#[derive(Debug, Clone)]
pub struct ControlGuidance {
    pub recommendation: String,
    pub rationale: String,
    pub resources: Vec<String>,
}

/// Guidance for a control id. Curated for the known controls, templated
/// from the control's function prefix otherwise.
pub fn control_guidance(control_id: &str) -> ControlGuidance {
    match control_id {
        "GV.OC-01" => ControlGuidance {
            recommendation: "Establish formal governance framework aligned with organizational mission"
                .to_string(),
            rationale: "Governance framework ensures cybersecurity aligns with business objectives"
                .to_string(),
            resources: vec![
                "NIST Governance Framework Template".to_string(),
                "Mission Alignment Guide".to_string(),
            ],
        },
        "PR.AA-01" => ControlGuidance {
            recommendation: "Implement comprehensive identity management system".to_string(),
            rationale: "Strong identity management is fundamental to access control".to_string(),
            resources: vec![
                "Identity Management Best Practices".to_string(),
                "IAM Implementation Guide".to_string(),
            ],
        },
        "DE.AE-02" => ControlGuidance {
            recommendation: "Deploy SIEM platform with threat intelligence integration".to_string(),
            rationale: "Advanced event analysis requires automated tools and threat intelligence"
                .to_string(),
            resources: vec![
                "SIEM Implementation Guide".to_string(),
                "Threat Intelligence Integration Guide".to_string(),
            ],
        },
        "RS.MA-01" => ControlGuidance {
            recommendation: "Develop formal incident response procedures and playbooks".to_string(),
            rationale: "Structured response procedures ensure effective incident handling".to_string(),
            resources: vec![
                "Incident Response Plan Template".to_string(),
                "Response Playbook Guide".to_string(),
            ],
        },
        _ => {
            let function = match control_id.split_once('.') {
                Some((prefix, _)) => prefix,
                None => "",
            };
            ControlGuidance {
                recommendation: format!(
                    "Implement {function} control {control_id} according to NIST guidelines"
                ),
                rationale: format!(
                    "Control {control_id} is essential for {function} category implementation"
                ),
                resources: vec![format!("NIST {function} Control Implementation Guide")],
            }
        }
    }
}

/// Control code from a task name: the text before the first `:`, trimmed.
/// Names without a colon (or with a blank prefix) carry no control code.
pub fn extract_control_id(task_name: &str) -> Option<&str> {
    let (code, _) = task_name.split_once(':')?;
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_recommendation_band_keyed() {
        // 30% and 40% both sit in band 1
        assert_eq!(
            category_recommendation("govern", 30),
            category_recommendation("govern", 40)
        );
        assert_eq!(
            category_recommendation("govern", 40),
            "Develop formal governance documentation and procedures"
        );
        assert_eq!(
            category_recommendation("detect", 10),
            "Establish basic detection capabilities and monitoring"
        );
        assert_eq!(
            category_recommendation("recover", 90),
            "Implement advanced recovery systems"
        );
    }

    #[test]
    fn test_category_recommendation_unknown_category_is_templated() {
        let text = category_recommendation("quantum", 42);
        assert!(text.contains("quantum"));
        assert!(text.contains("42%"));
    }

    #[test]
    fn test_category_rationale_band_keyed() {
        assert_eq!(
            category_rationale("protect", 5),
            "No protective measures in place, leaving systems vulnerable to attacks"
        );
        assert_eq!(
            category_rationale("respond", 60),
            "Moderate response capabilities need enhancement"
        );
        let fallback = category_rationale("quantum", 42);
        assert!(fallback.contains("quantum"));
        assert!(fallback.contains("42%"));
    }

    #[test]
    fn test_category_resources_known_and_fallback() {
        let govern = category_resources("govern");
        assert_eq!(govern.len(), 3);
        assert_eq!(govern[0], "NIST Governance Framework Template");

        assert_eq!(
            category_resources("quantum"),
            vec!["General cybersecurity best practices guide"]
        );
    }

    #[test]
    fn test_control_guidance_curated() {
        let g = control_guidance("DE.AE-02");
        assert!(g.recommendation.contains("SIEM"));
        assert_eq!(g.resources.len(), 2);
    }

    #[test]
    fn test_control_guidance_generic_uses_function_prefix() {
        let g = control_guidance("PR.DS-11");
        assert_eq!(
            g.recommendation,
            "Implement PR control PR.DS-11 according to NIST guidelines"
        );
        assert_eq!(
            g.rationale,
            "Control PR.DS-11 is essential for PR category implementation"
        );
        assert_eq!(g.resources, vec!["NIST PR Control Implementation Guide"]);
    }

    #[test]
    fn test_control_guidance_generic_without_dot() {
        let g = control_guidance("WEIRD-01");
        assert_eq!(
            g.recommendation,
            "Implement  control WEIRD-01 according to NIST guidelines"
        );
    }

    #[test]
    fn test_extract_control_id() {
        assert_eq!(
            extract_control_id("GV.OC-01: Organizational Context"),
            Some("GV.OC-01")
        );
        assert_eq!(extract_control_id("  PR.AA-01 : Identity"), Some("PR.AA-01"));
        assert_eq!(extract_control_id("No colon here"), None);
        assert_eq!(extract_control_id(": blank prefix"), None);
        assert_eq!(extract_control_id(""), None);
    }
}
