//! Post-processing of raw model replies.
//!
//! Some model families interleave a reasoning segment with the final answer,
//! delimited by a model-specific marker. Which marker applies is a per-model
//! policy looked up by substring match against the model name, not a check
//! hardcoded at each call site.

/// One text-extraction rule: models whose name contains `model_pattern`
/// put their answer after the final occurrence of `delimiter`.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub model_pattern: String,
    pub delimiter: String,
}

impl ExtractionRule {
    pub fn new(model_pattern: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            model_pattern: model_pattern.into().to_lowercase(),
            delimiter: delimiter.into(),
        }
    }
}

/// Reply post-processor: thinking-marker extraction plus code-fence stripping.
pub struct ResponseCleanup {
    rules: Vec<ExtractionRule>,
}

impl Default for ResponseCleanup {
    fn default() -> Self {
        Self {
            rules: vec![
                ExtractionRule::new("qwen3", "</think>"),
                ExtractionRule::new("deepseek-r1", "</think>"),
            ],
        }
    }
}

impl ResponseCleanup {
    pub fn with_rules(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    /// Reduce a raw reply to the answer text: apply the matching thinking
    /// rule (keeping only text after the final delimiter), then strip any
    /// surrounding markdown code fence.
    pub fn extract_answer(&self, model_name: &str, content: &str) -> String {
        let model_lower = model_name.to_lowercase();

        let mut text = content;
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| model_lower.contains(&r.model_pattern))
        {
            if let Some(idx) = text.rfind(&rule.delimiter) {
                text = &text[idx + rule.delimiter.len()..];
            }
        }

        strip_code_fences(text)
    }
}

/// Remove a wrapping markdown code fence (``` or ```json) if present.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    // Drop the opening fence line (which may carry a language tag).
    let inner = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return String::new(),
    };

    let inner = inner.trim_end();
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_code_fence() {
        let content = "```json\n{\"query\": \"rust async\"}\n```";
        assert_eq!(strip_code_fences(content), "{\"query\": \"rust async\"}");
    }

    #[test]
    fn test_strip_plain_code_fence() {
        let content = "```\n{\"query\": \"x\"}\n```";
        assert_eq!(strip_code_fences(content), "{\"query\": \"x\"}");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_thinking_delimiter_keeps_text_after_final_marker() {
        let cleanup = ResponseCleanup::default();
        let raw = "<think>first</think>middle<think>second</think>{\"query\": \"final\"}";
        let answer = cleanup.extract_answer("qwen3:8b", raw);
        assert_eq!(answer, "{\"query\": \"final\"}");
    }

    #[test]
    fn test_thinking_rule_ignored_for_other_models() {
        let cleanup = ResponseCleanup::default();
        let raw = "</think>leftover";
        assert_eq!(cleanup.extract_answer("llama3.2", raw), "</think>leftover");
    }

    #[test]
    fn test_thinking_then_fence() {
        let cleanup = ResponseCleanup::default();
        let raw = "<think>reasoning</think>\n```json\n{\"query\": \"q\"}\n```";
        assert_eq!(
            cleanup.extract_answer("qwen3", raw),
            "{\"query\": \"q\"}"
        );
    }
}
