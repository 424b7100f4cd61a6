//! Prompts, response schemas and strict response parsing
//!
//! Each assistant operation pairs a prompt with the JSON Schema its answer
//! must follow, and a typed struct the answer is parsed into. A missing
//! required field is a parse failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::GatewayError;
use crate::types::{JokeParts, Technique};

/// Number of themes requested per call
pub const THEME_COUNT: usize = 5;

/// Number of approaches requested when expanding a theme
pub const SUGGESTION_COUNT: usize = 3;

const MENTOR: &str = "You are a senior stand-up comedy writer with deep knowledge of \
Greg Dean's joke structure and Leo Lins' writing style.";

/// Answer to a theme request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeIdeas {
    /// Theme ideas
    pub ideas: Vec<String>,
    /// Optional note from the model
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Answer to a theme expansion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeExpansion {
    /// Premise / setup / punchline approaches
    pub suggestions: Vec<JokeParts>,
}

/// A rewritten joke
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedJoke {
    /// The rewritten parts
    #[serde(flatten)]
    pub parts: JokeParts,
    /// What the model changed and why it works
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Prompt asking for themes, optionally around a context
#[must_use]
pub fn themes_prompt(context: Option<&str>, language: &str) -> String {
    let ask = match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Generate {THEME_COUNT} unusual themes for stand-up jokes based on this context: \
             {context}. Focus on everyday situations, social observations or personal frustrations."
        ),
        None => format!(
            "Generate {THEME_COUNT} random, highly relatable themes for stand-up comedy jokes."
        ),
    };
    format!("{ask}\n\nAnswer in {language}.")
}

/// Prompt asking for premise / setup / punchline approaches to a theme
#[must_use]
pub fn expand_prompt(theme: &str, language: &str) -> String {
    format!(
        "Act as a comedy writing mentor versed in Greg Dean and Leo Lins.\n\
         For the theme \"{theme}\", suggest {SUGGESTION_COUNT} different approaches.\n\
         For each approach provide:\n\
         1. A clear premise.\n\
         2. A setup that builds a solid assumption (Greg Dean).\n\
         3. A punchline that reveals an unexpected reinterpretation (the \"connector\").\n\
         Think of original, technical and funny angles.\n\n\
         Answer in {language}."
    )
}

/// Technique-specific rewriting instruction
#[must_use]
pub fn refine_instruction(technique: Technique) -> String {
    match technique {
        Technique::GregDean => "Apply Greg Dean's method: identify the Connector (the element \
            with a double meaning in the setup), make the Target Assumption clear and write a \
            Reinterpretation (the punchline) that surprises."
            .to_string(),
        Technique::LeoLins => "Apply Leo Lins' style: use Mapping. List the features of the \
            subject, look for technical angles, explore the absurd and, where it fits, use acid \
            humor or sharp social observation. Make every word count."
            .to_string(),
        other => format!("Use the \"{}\" technique to improve this joke.", other.label()),
    }
}

/// Prompt asking for an improved version of a joke
#[must_use]
pub fn refine_prompt(parts: &JokeParts, technique: Technique, language: &str) -> String {
    format!(
        "{MENTOR}\n{instruction}\n\n\
         Original premise: {premise}\n\
         Original setup: {setup}\n\
         Original punchline: {punchline}\n\n\
         Return the improved version, with a short explanation of what changed. \
         Answer in {language}.",
        instruction = refine_instruction(technique),
        premise = parts.premise,
        setup = parts.setup,
        punchline = parts.punchline,
    )
}

/// Schema for [`ThemeIdeas`]
#[must_use]
pub fn themes_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "ideas": { "type": "array", "items": { "type": "string" } },
            "explanation": { "type": "string" }
        },
        "required": ["ideas"]
    })
}

fn parts_properties() -> serde_json::Value {
    serde_json::json!({
        "premise": { "type": "string" },
        "setup": { "type": "string" },
        "punchline": { "type": "string" }
    })
}

/// Schema for [`ThemeExpansion`]
#[must_use]
pub fn expand_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": parts_properties(),
                    "required": ["premise", "setup", "punchline"]
                }
            }
        },
        "required": ["suggestions"]
    })
}

/// Schema for [`RefinedJoke`]
#[must_use]
pub fn refine_schema() -> serde_json::Value {
    let mut properties = parts_properties();
    properties["explanation"] = serde_json::json!({ "type": "string" });
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": ["premise", "setup", "punchline"]
    })
}

/// Strip a surrounding Markdown code fence, if any
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model answer into a typed response
pub fn parse_response<T: DeserializeOwned>(content: &str) -> Result<T, GatewayError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| GatewayError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_themes_prompt_uses_context_only_when_present() {
        let plain = themes_prompt(None, "English");
        assert!(plain.contains("random"));
        assert!(plain.ends_with("Answer in English."));

        let blank = themes_prompt(Some("   "), "English");
        assert_eq!(blank, plain);

        let contextual = themes_prompt(Some("airports"), "English");
        assert!(contextual.contains("context: airports"));
    }

    #[test]
    fn test_refine_instructions_are_technique_specific() {
        assert!(refine_instruction(Technique::GregDean).contains("Connector"));
        assert!(refine_instruction(Technique::LeoLins).contains("Mapping"));
        assert_eq!(
            refine_instruction(Technique::RuleOfThree),
            "Use the \"Rule of Three\" technique to improve this joke."
        );
    }

    #[test]
    fn test_refine_prompt_includes_parts() {
        let prompt = refine_prompt(
            &JokeParts::new("gyms", "I pay monthly", "for guilt"),
            Technique::Irony,
            "Brazilian Portuguese",
        );
        assert!(prompt.contains("Original premise: gyms"));
        assert!(prompt.contains("Original punchline: for guilt"));
        assert!(prompt.contains("Answer in Brazilian Portuguese."));
    }

    #[test]
    fn test_parse_refined_joke() {
        let refined: RefinedJoke =
            parse_response(r#"{"premise":"X2","setup":"Y","punchline":"Z"}"#).unwrap();
        assert_eq!(refined.parts, JokeParts::new("X2", "Y", "Z"));
        assert_eq!(refined.explanation, None);
    }

    #[test]
    fn test_missing_required_field_is_parse_error() {
        let result: Result<RefinedJoke, _> = parse_response(r#"{"premise":"X2","setup":"Y"}"#);
        assert!(matches!(result, Err(GatewayError::Parse(_))));

        let result: Result<ThemeIdeas, _> = parse_response(r#"{"explanation":"none"}"#);
        assert!(matches!(result, Err(GatewayError::Parse(_))));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = "```json\n{\"ideas\":[\"a\",\"b\"]}\n```\n";
        let ideas: ThemeIdeas = parse_response(fenced).unwrap();
        assert_eq!(ideas.ideas, vec!["a", "b"]);
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_blank_answer_is_empty_response() {
        let result: Result<ThemeIdeas, _> = parse_response("  ");
        assert_eq!(result.unwrap_err(), GatewayError::EmptyResponse);
    }

    #[test]
    fn test_refine_schema_requires_parts_only() {
        let schema = refine_schema();
        assert_eq!(schema["required"], serde_json::json!(["premise", "setup", "punchline"]));
        assert_eq!(schema["properties"]["explanation"]["type"], "string");
    }
}
