use crate::ai::{ShapeExtractor, ai_parse};
use crate::parser::parse_prompt;
use crate::shape::ShapeSpec;

/// Turn a prompt into a spec. Never fails.
///
/// With `prefer_ai` set and an extractor available, the extractor is tried
/// first; anything short of a valid spec from it falls through to the
/// rule-based parser.
pub fn resolve(prompt: &str, prefer_ai: bool, extractor: Option<&dyn ShapeExtractor>) -> ShapeSpec {
    if prefer_ai {
        match extractor {
            Some(extractor) => match ai_parse(prompt, extractor) {
                Ok(spec) => {
                    tracing::info!(shape = %spec.shape, "resolved prompt with AI extraction");
                    return spec;
                }
                Err(reason) => {
                    tracing::warn!(%reason, "AI extraction unavailable, using rule-based parser");
                }
            },
            None => tracing::debug!("no extractor configured, using rule-based parser"),
        }
    }

    let spec = parse_prompt(prompt);
    tracing::info!(shape = %spec.shape, "resolved prompt with rule-based parser");
    spec
}

/// Owns an optional extractor so callers only pass the prompt around.
#[derive(Default)]
pub struct Resolver {
    extractor: Option<Box<dyn ShapeExtractor>>,
}

impl Resolver {
    pub fn new(extractor: Option<Box<dyn ShapeExtractor>>) -> Self {
        Self { extractor }
    }

    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn resolve(&self, prompt: &str, prefer_ai: bool) -> ShapeSpec {
        resolve(prompt, prefer_ai, self.extractor.as_deref())
    }
}
