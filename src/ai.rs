//! AI-assisted shape extraction.
//!
//! A language model is asked for strict JSON matching [`ShapeSpec`]. Every
//! way this can go wrong ends up as an [`Unavailable`] value so the caller
//! can fall back to the rule-based parser.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::Settings;
use crate::shape::{ShapeError, ShapeSpec};

pub const EXTRACTION_INSTRUCTIONS: &str = r#"Return ONLY valid JSON:
{
  "shape": "square|rectangle|triangle|circle|regular_polygon",
  "side": number|null,
  "width": number|null,
  "height": number|null,
  "radius": number|null,
  "n_sides": integer|null
}
Map pentagon/hexagon/etc => regular_polygon with correct n_sides.
If dimensions missing, use null (do not guess)."#;

#[derive(Debug, thiserror::Error)]
pub enum Unavailable {
    #[error("no OpenAI API key configured")]
    MissingApiKey,

    #[error("extraction request failed: {0}")]
    Request(String),

    #[error("extraction service returned status {status}")]
    Status { status: u16, body: String },

    #[error("extraction response could not be read: {0}")]
    Response(String),

    #[error("model output is not a JSON object: {0}")]
    NotJson(String),

    #[error("model output does not describe a usable shape: {0}")]
    Invalid(#[from] ShapeError),
}

/// Something that turns a prompt into raw model text, expected to be JSON.
///
/// Extractors are shared between concurrent requests.
pub trait ShapeExtractor: Send + Sync {
    fn extract(&self, prompt: &str) -> Result<String, Unavailable>;
}

/// Ask `extractor` for a spec and validate what comes back.
pub fn ai_parse(prompt: &str, extractor: &dyn ShapeExtractor) -> Result<ShapeSpec, Unavailable> {
    let text = extractor.extract(prompt)?;
    spec_from_model_output(&text)
}

/// Parse model output into a validated spec. Markdown code fences around the
/// payload are tolerated.
pub fn spec_from_model_output(text: &str) -> Result<ShapeSpec, Unavailable> {
    let payload = strip_fences(text);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| Unavailable::NotJson(e.to_string()))?;
    if !value.as_object().is_some_and(|o| !o.is_empty()) {
        return Err(Unavailable::NotJson(format!("expected a non-empty object, got {}", value)));
    }

    let spec: ShapeSpec =
        serde_json::from_value(value).map_err(|e| Unavailable::Response(e.to_string()))?;
    spec.validate()?;
    Ok(spec)
}

/// Remove a surrounding ```` ```json ... ``` ```` fence, if any.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    match text.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim()
            .trim_end_matches('`')
            .trim(),
        None => text,
    }
}

// =============================================================================
// OPENAI RESPONSES CLIENT
// =============================================================================

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 2],
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// [`ShapeExtractor`] backed by the OpenAI `/responses` endpoint.
pub struct OpenAiExtractor {
    agent: ureq::Agent,
    settings: Settings,
}

impl OpenAiExtractor {
    pub fn new(settings: Settings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.request_timeout_secs)))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            settings,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.settings.api_key().is_some()
    }
}

impl ShapeExtractor for OpenAiExtractor {
    fn extract(&self, prompt: &str) -> Result<String, Unavailable> {
        let api_key = self.settings.api_key().ok_or(Unavailable::MissingApiKey)?;

        let request = ResponsesRequest {
            model: &self.settings.openai_model,
            input: [
                InputMessage {
                    role: "system",
                    content: EXTRACTION_INSTRUCTIONS,
                },
                InputMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        let body = serde_json::to_string(&request).map_err(|e| Unavailable::Request(e.to_string()))?;
        let url = format!("{}/responses", self.settings.openai_base_url);

        tracing::debug!(%url, model = %self.settings.openai_model, "requesting shape extraction");
        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .send(body)
            .map_err(|e| Unavailable::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Unavailable::Response(e.to_string()))?;
        if status != 200 {
            return Err(Unavailable::Status { status, body: text });
        }

        output_text(&text)
    }
}

/// Concatenated `output_text` parts of a Responses API reply.
pub(crate) fn output_text(json_text: &str) -> Result<String, Unavailable> {
    let root: Value =
        serde_json::from_str(json_text).map_err(|e| Unavailable::Response(e.to_string()))?;

    let mut out = String::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in parts {
                let kind = part.get("type").and_then(Value::as_str);
                if matches!(kind, Some("output_text" | "text")) {
                    if let Some(text) = part.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
            }
        }
    }
    if out.is_empty() {
        if let Some(text) = root.get("output_text").and_then(Value::as_str) {
            out.push_str(text);
        }
    }

    if out.trim().is_empty() {
        return Err(Unavailable::Response("no output text in response".to_string()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl ShapeExtractor for Canned {
        fn extract(&self, _prompt: &str) -> Result<String, Unavailable> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn strips_code_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn fenced_json_becomes_spec() {
        let spec = ai_parse(
            "a hexagon",
            &Canned("```json\n{\"shape\":\"regular_polygon\",\"side\":null,\"width\":null,\"height\":null,\"radius\":2,\"n_sides\":6}\n```"),
        )
        .unwrap();
        assert_eq!(spec.shape, "regular_polygon");
        assert_eq!(spec.radius, Some(2.0));
        assert_eq!(spec.n_sides, Some(6));
    }

    #[test]
    fn prose_is_not_json() {
        let err = ai_parse("x", &Canned("Sure! Here is your shape.")).unwrap_err();
        assert!(matches!(err, Unavailable::NotJson(_)));
    }

    #[test]
    fn empty_object_or_array_is_rejected() {
        assert!(matches!(spec_from_model_output("{}"), Err(Unavailable::NotJson(_))));
        assert!(matches!(spec_from_model_output("[1,2]"), Err(Unavailable::NotJson(_))));
    }

    #[test]
    fn schema_mismatch_is_unavailable() {
        let err = spec_from_model_output(r#"{"shape":"circle","radius":"big"}"#).unwrap_err();
        assert!(matches!(err, Unavailable::Response(_)));
        let err = spec_from_model_output(r#"{"radius":2}"#).unwrap_err();
        assert!(matches!(err, Unavailable::Response(_)));
    }

    #[test]
    fn float_side_count_is_usable() {
        let spec =
            spec_from_model_output(r#"{"shape":"regular_polygon","radius":2,"n_sides":6.0}"#)
                .unwrap();
        assert_eq!(spec.n_sides, Some(6));
        let err = spec_from_model_output(r#"{"shape":"regular_polygon","n_sides":6.5}"#)
            .unwrap_err();
        assert!(matches!(err, Unavailable::Response(_)));
    }

    #[test]
    fn invalid_fields_are_unavailable() {
        let err = spec_from_model_output(r#"{"shape":"regular_polygon","n_sides":2}"#).unwrap_err();
        assert!(matches!(err, Unavailable::Invalid(ShapeError::InvalidPolygon { n_sides: 2 })));
        let err = spec_from_model_output(r#"{"shape":"blob"}"#).unwrap_err();
        assert!(matches!(err, Unavailable::Invalid(ShapeError::UnsupportedShape(_))));
    }

    #[test]
    fn missing_key_short_circuits() {
        let extractor = OpenAiExtractor::new(Settings::default());
        assert!(!extractor.has_credentials());
        assert!(matches!(extractor.extract("circle"), Err(Unavailable::MissingApiKey)));
    }

    #[test]
    fn reads_message_output_text() {
        let json = serde_json::json!({
            "model": "gpt-4o-mini",
            "output": [
                { "type": "reasoning", "summary": [] },
                {
                    "type": "message",
                    "content": [{ "type": "output_text", "text": "{\"shape\":\"circle\"}" }]
                }
            ]
        })
        .to_string();
        assert_eq!(output_text(&json).unwrap(), "{\"shape\":\"circle\"}");
    }

    #[test]
    fn reads_top_level_output_text() {
        let json = serde_json::json!({ "output_text": "{\"shape\":\"square\"}" }).to_string();
        assert_eq!(output_text(&json).unwrap(), "{\"shape\":\"square\"}");
    }

    #[test]
    fn empty_output_is_unavailable() {
        let json = serde_json::json!({ "output": [] }).to_string();
        assert!(matches!(output_text(&json), Err(Unavailable::Response(_))));
    }
}
