//! Upstream survey payloads and the normalized snapshot handed to the
//! pipeline.
//!
//! The survey API is loose with types: scores arrive as ints, floats,
//! numeric strings, or null, and the meta `scores` field is sometimes a
//! JSON object and sometimes a JSON object *encoded as a string*. Parsing
//! here is deliberately lenient so one malformed field degrades to a
//! warning instead of failing the whole request.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Category name -> score percentage (0-100), sorted by category.
pub type CategoryScores = BTreeMap<String, i64>;

/// One survey task (a NIST control question) as returned by the survey API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyTask {
    /// Upstream id; kept as raw JSON since the API mixes numbers and strings.
    pub id: Value,
    pub name: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: Option<i64>,
    /// e.g. "govern function", first word is the CSF function name.
    pub kind: String,
    pub sub_system: String,
    pub additional_context: String,
    pub informative_references: String,
}

/// Accepts ints, floats (truncated), numeric strings, and null.
/// Anything else parses as `None` rather than erroring.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_score))
}

fn coerce_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Body of `GET /surveyTasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskEnvelope {
    pub tasks: Vec<SurveyTask>,
}

/// Body of `GET /survey`. Only `scores` matters; it may be an object or a
/// string-encoded object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSurveyMeta {
    pub scores: Value,
}

/// Normalizes the meta `scores` field into per-category integers.
///
/// Returns the scores plus a warning when the field held something that can
/// never yield a score map: a string that did not decode to a JSON object, or
/// any other non-null value. Null stays silent because an absent field
/// deserializes to null. Non-numeric entries are dropped.
pub fn normalize_scores(scores: &Value) -> (CategoryScores, Option<String>) {
    match scores {
        Value::Object(map) => (collect_scores(map), None),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(map)) => (collect_scores(&map), None),
            _ => (
                CategoryScores::new(),
                Some("Could not parse scores data".to_string()),
            ),
        },
        Value::Null => (CategoryScores::new(), None),
        _ => (
            CategoryScores::new(),
            Some("Could not parse scores data".to_string()),
        ),
    }
}

fn collect_scores(map: &serde_json::Map<String, Value>) -> CategoryScores {
    map.iter()
        .filter_map(|(category, raw)| coerce_score(raw).map(|s| (category.clone(), s)))
        .collect()
}

/// Everything fetched for one survey, after reconciliation. Data problems
/// upstream surface as `warnings`; only transport failures abort a fetch.
#[derive(Debug, Clone)]
pub struct SurveySnapshot {
    pub survey_id: u32,
    pub task_status: u16,
    pub meta_status: u16,
    pub scores: CategoryScores,
    pub tasks: Vec<SurveyTask>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_parses_camel_case_fields() {
        let task: SurveyTask = serde_json::from_value(json!({
            "id": 17,
            "name": "GV.OC-01: Organizational Context",
            "score": 2,
            "kind": "govern function",
            "subSystem": "Organizational Context",
            "additionalContext": "Reviewed annually",
            "informativeReferences": "CIS 14"
        }))
        .unwrap();

        assert_eq!(task.name, "GV.OC-01: Organizational Context");
        assert_eq!(task.score, Some(2));
        assert_eq!(task.kind, "govern function");
        assert_eq!(task.sub_system, "Organizational Context");
        assert_eq!(task.additional_context, "Reviewed annually");
        assert_eq!(task.informative_references, "CIS 14");
    }

    #[test]
    fn test_task_missing_fields_default() {
        let task: SurveyTask = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(task.score, None);
        assert_eq!(task.kind, "");
        assert!(task.id.is_null());
    }

    #[test]
    fn test_score_coercion_variants() {
        let parse = |v: Value| -> Option<i64> {
            let task: SurveyTask = serde_json::from_value(json!({"score": v})).unwrap();
            task.score
        };

        assert_eq!(parse(json!(3)), Some(3));
        assert_eq!(parse(json!(2.7)), Some(2));
        assert_eq!(parse(json!("2")), Some(2));
        assert_eq!(parse(json!(" 4 ")), Some(4));
        assert_eq!(parse(json!("3.9")), Some(3));
        assert_eq!(parse(json!(null)), None);
        assert_eq!(parse(json!(true)), None);
        assert_eq!(parse(json!("not a number")), None);
    }

    #[test]
    fn test_normalize_scores_object() {
        let (scores, warning) = normalize_scores(&json!({"govern": 40, "detect": 75.5}));
        assert_eq!(warning, None);
        assert_eq!(scores.get("govern"), Some(&40));
        assert_eq!(scores.get("detect"), Some(&75));
    }

    #[test]
    fn test_normalize_scores_string_encoded_object() {
        let (scores, warning) = normalize_scores(&json!("{\"protect\": \"60\"}"));
        assert_eq!(warning, None);
        assert_eq!(scores.get("protect"), Some(&60));
    }

    #[test]
    fn test_normalize_scores_unparseable_string_warns() {
        let (scores, warning) = normalize_scores(&json!("not json at all"));
        assert!(scores.is_empty());
        assert_eq!(warning, Some("Could not parse scores data".to_string()));
    }

    #[test]
    fn test_normalize_scores_drops_non_numeric_entries() {
        let (scores, warning) = normalize_scores(&json!({"govern": 40, "notes": "n/a"}));
        assert_eq!(warning, None);
        assert_eq!(scores.len(), 1);
        assert!(!scores.contains_key("notes"));
    }

    #[test]
    fn test_normalize_scores_null_is_empty_without_warning() {
        let (scores, warning) = normalize_scores(&json!(null));
        assert!(scores.is_empty());
        assert_eq!(warning, None);
    }

    #[test]
    fn test_normalize_scores_non_null_garbage_warns() {
        for garbage in [json!(42), json!([1, 2]), json!(true)] {
            let (scores, warning) = normalize_scores(&garbage);
            assert!(scores.is_empty(), "{garbage}");
            assert_eq!(
                warning,
                Some("Could not parse scores data".to_string()),
                "{garbage}"
            );
        }
    }

    #[test]
    fn test_task_envelope_tolerates_missing_key() {
        let envelope: TaskEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.tasks.is_empty());

        let envelope: TaskEnvelope =
            serde_json::from_value(json!({"tasks": [{"name": "a"}]})).unwrap();
        assert_eq!(envelope.tasks.len(), 1);
    }
}
