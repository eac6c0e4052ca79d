//! Response extraction and report normalization
//!
//! The agent may answer with `{"response": ..}`, `{"message": ..}`, an
//! OpenAI-style `choices` array, `{"content": ..}`, a bare JSON string or
//! plain text. [`extract_response_text`] reduces all of these to one string
//! and [`ValidationReport::from_response`] turns that string into either a
//! structured report or an opaque one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One way of pulling the response text out of a JSON document.
pub type Extractor = fn(&Value) -> Option<String>;

/// Extractors in priority order; the first match wins.
pub const EXTRACTORS: [(&str, Extractor); 4] = [
    ("response", extract_response_field),
    ("message", extract_message_field),
    ("choices[0].message.content", extract_choice_content),
    ("content", extract_content_field),
];

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) if !map.is_empty() => Some(value.to_string()),
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        _ => None,
    }
}

fn extract_response_field(doc: &Value) -> Option<String> {
    doc.get("response").and_then(text_of)
}

fn extract_message_field(doc: &Value) -> Option<String> {
    doc.get("message").and_then(text_of)
}

fn extract_choice_content(doc: &Value) -> Option<String> {
    doc.pointer("/choices/0/message/content").and_then(text_of)
}

fn extract_content_field(doc: &Value) -> Option<String> {
    doc.get("content").and_then(text_of)
}

/// Reduce a raw success body to the agent's response text.
///
/// Falls back to the raw body whenever no known shape matches.
pub fn extract_response_text(raw: &str) -> String {
    let Ok(doc) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    if let Value::String(text) = doc {
        return text;
    }

    for (name, extract) in EXTRACTORS {
        if let Some(text) = extract(&doc) {
            debug!(extractor = name, "extracted response text");
            return text;
        }
    }
    debug!("no known response shape, using raw body");
    raw.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickVerdict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yc_fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_risk: Option<String>,
}

/// Score and reasoning for one evaluation criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedEvaluation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_solution: Option<CriterionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_opportunity: Option<CriterionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traction_validation: Option<CriterionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_execution: Option<CriterionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalability_growth: Option<CriterionScore>,
}

impl DetailedEvaluation {
    /// Present criteria with their display labels, in report order.
    pub fn criteria(&self) -> Vec<(&'static str, &CriterionScore)> {
        [
            ("Problem & Solution", &self.problem_solution),
            ("Market Opportunity", &self.market_opportunity),
            ("Traction & Validation", &self.traction_validation),
            ("Team & Execution", &self.team_execution),
            ("Scalability & Growth", &self.scalability_growth),
        ]
        .into_iter()
        .filter_map(|(label, criterion)| criterion.as_ref().map(|c| (label, c)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCompany {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitiveLandscape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_yc_companies: Option<Vec<SimilarCompany>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differentiation_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_opportunities: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionableInsights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengthen: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_consider: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YcReadyPitch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
}

/// The multi-section evaluation. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_verdict: Option<QuickVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_evaluation: Option<DetailedEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_landscape: Option<CompetitiveLandscape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable_insights: Option<ActionableInsights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yc_ready_pitch: Option<YcReadyPitch>,
}

impl StructuredReport {
    pub fn has_sections(&self) -> bool {
        self.quick_verdict.is_some()
            || self.detailed_evaluation.is_some()
            || self.competitive_landscape.is_some()
            || self.actionable_insights.is_some()
            || self.yc_ready_pitch.is_some()
    }
}

/// Normalized form of a successful response: fully structured or fully opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "report", rename_all = "snake_case")]
pub enum ValidationReport {
    Structured(StructuredReport),
    Opaque(String),
}

impl ValidationReport {
    /// Parse the agent's response text. Never fails: anything that is not a
    /// JSON object with at least one known section becomes `Opaque`.
    pub fn from_response(text: &str) -> Self {
        match serde_json::from_str::<StructuredReport>(text) {
            Ok(report) if report.has_sections() => ValidationReport::Structured(report),
            _ => ValidationReport::Opaque(text.to_string()),
        }
    }

    /// Extract the response text from a raw body, then parse it.
    pub fn from_raw_body(raw: &str) -> Self {
        Self::from_response(&extract_response_text(raw))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ValidationReport::Structured(_))
    }

    pub fn structured(&self) -> Option<&StructuredReport> {
        match self {
            ValidationReport::Structured(report) => Some(report),
            ValidationReport::Opaque(_) => None,
        }
    }
}

/// Colour band for a score such as `"8/10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    /// Reads the leading integer. Unparsable scores are `Weak`.
    pub fn from_score(score: &str) -> Self {
        let head = score.split('/').next().unwrap_or_default().trim();
        let digits: String = head
            .chars()
            .enumerate()
            .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
            .map(|(_, c)| c)
            .collect();

        match digits.parse::<i64>() {
            Ok(n) if n >= 8 => ScoreBand::Strong,
            Ok(n) if n >= 6 => ScoreBand::Moderate,
            _ => ScoreBand::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitBand {
    High,
    Medium,
    Low,
    Unrated,
}

impl FitBand {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => FitBand::High,
            "medium" => FitBand::Medium,
            "low" => FitBand::Low,
            _ => FitBand::Unrated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_priority() {
        let raw = r#"{"content":"c","message":"m","response":"r"}"#;
        assert_eq!(extract_response_text(raw), "r");

        let raw = r#"{"content":"c","message":"m"}"#;
        assert_eq!(extract_response_text(raw), "m");

        let raw = r#"{"choices":[{"message":{"content":"chat"}}],"content":"c"}"#;
        assert_eq!(extract_response_text(raw), "chat");

        let raw = r#"{"content":"c"}"#;
        assert_eq!(extract_response_text(raw), "c");
    }

    #[test]
    fn test_empty_fields_fall_through() {
        let raw = r#"{"response":"","message":"m"}"#;
        assert_eq!(extract_response_text(raw), "m");
    }

    #[test]
    fn test_unmatched_shapes_fall_back_to_raw() {
        for raw in [r#"{"other":1}"#, "[1,2]", "42", "plain text answer", ""] {
            assert_eq!(extract_response_text(raw), raw);
        }
    }

    #[test]
    fn test_bare_json_string() {
        assert_eq!(extract_response_text(r#""hello there""#), "hello there");
    }

    #[test]
    fn test_object_response_is_reserialized() {
        let raw = r#"{"response":{"quick_verdict":{"overall_score":"7/10"}}}"#;
        let text = extract_response_text(raw);
        let report = ValidationReport::from_response(&text);
        assert_eq!(
            report.structured().and_then(|r| r.quick_verdict.as_ref()).and_then(|q| q.overall_score.as_deref()),
            Some("7/10")
        );
    }

    #[test]
    fn test_nested_report_scenario() {
        let raw = r#"{"response":"{\"quick_verdict\":{\"overall_score\":\"8/10\"}}"}"#;
        let report = ValidationReport::from_raw_body(raw);

        let ValidationReport::Structured(report) = report else {
            panic!("expected structured report");
        };
        let verdict = report.quick_verdict.unwrap();
        assert_eq!(verdict.overall_score.as_deref(), Some("8/10"));
        assert_eq!(verdict.yc_fit, None);
    }

    #[test]
    fn test_structured_fields_preserved() {
        let text = r#"{
            "quick_verdict": {"overall_score": "6/10", "yc_fit": "Medium", "key_strength": "Distribution", "major_risk": "Churn"},
            "detailed_evaluation": {"market_opportunity": {"score": "7/10", "reasoning": "Large TAM"}},
            "competitive_landscape": {"similar_yc_companies": [{"company_name": "Faire", "batch_year": "W17"}]},
            "actionable_insights": {"strengthen": ["Interview 20 chefs"], "validate": [], "pivot_consider": ["B2C"]},
            "yc_ready_pitch": {"pitch": "Farm to table, minus the middlemen."}
        }"#;

        let report = ValidationReport::from_response(text);
        let structured = report.structured().unwrap();

        let verdict = structured.quick_verdict.as_ref().unwrap();
        assert_eq!(verdict.major_risk.as_deref(), Some("Churn"));

        let evaluation = structured.detailed_evaluation.as_ref().unwrap();
        let criteria = evaluation.criteria();
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria[0].0, "Market Opportunity");
        assert_eq!(criteria[0].1.reasoning.as_deref(), Some("Large TAM"));

        let companies = structured
            .competitive_landscape
            .as_ref()
            .and_then(|c| c.similar_yc_companies.as_ref())
            .unwrap();
        assert_eq!(companies[0].batch_year.as_deref(), Some("W17"));

        let insights = structured.actionable_insights.as_ref().unwrap();
        assert_eq!(insights.validate, Some(Vec::new()));
        assert_eq!(
            structured.yc_ready_pitch.as_ref().unwrap().pitch.as_deref(),
            Some("Farm to table, minus the middlemen.")
        );
    }

    #[test]
    fn test_non_json_is_opaque() {
        let text = "Great idea! Score: 8/10";
        assert_eq!(
            ValidationReport::from_response(text),
            ValidationReport::Opaque(text.to_string())
        );
    }

    #[test]
    fn test_wrong_shape_is_opaque() {
        for text in [
            r#""just a string""#,
            "[1,2,3]",
            "{}",
            r#"{"unrelated":true}"#,
            r#"{"quick_verdict":"great"}"#,
            r#"{"quick_verdict":{"overall_score":8}}"#,
        ] {
            assert_eq!(
                ValidationReport::from_response(text),
                ValidationReport::Opaque(text.to_string()),
                "{text}"
            );
        }
    }

    #[test]
    fn test_empty_body_is_opaque() {
        assert_eq!(ValidationReport::from_raw_body(""), ValidationReport::Opaque(String::new()));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score("8/10"), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score("10/10"), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score("6/10"), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score("7"), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score("5/10"), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score("n/a"), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(""), ScoreBand::Weak);
    }

    #[test]
    fn test_fit_bands() {
        assert_eq!(FitBand::from_label("High"), FitBand::High);
        assert_eq!(FitBand::from_label("MEDIUM"), FitBand::Medium);
        assert_eq!(FitBand::from_label("low"), FitBand::Low);
        assert_eq!(FitBand::from_label("maybe"), FitBand::Unrated);
    }

    #[test]
    fn test_extractor_priority_order() {
        let names: Vec<&str> = EXTRACTORS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["response", "message", "choices[0].message.content", "content"]);
        assert_eq!(
            extract_response_text(r#"{"content":"last","message":"second"}"#),
            "second"
        );
    }
}
