use std::sync::LazyLock;

use regex::Regex;

static FENCED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").ok());
static FENCE_MARK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"```[A-Za-z]*").ok());
static SVG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<svg.*</svg>").ok());

/// Unwrap a reply that arrived inside a Markdown code block.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    FENCED
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// The `<svg>...</svg>` fragment of a reply, fences and chatter removed.
pub fn extract_svg(text: &str) -> Option<String> {
    let unfenced = match FENCE_MARK.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    };
    SVG.as_ref()?
        .find(&unfenced)
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(strip_code_fences(text), "[{\"a\": 1}]");
    }

    #[test]
    fn test_strip_bare_fence_and_plain_text() {
        assert_eq!(strip_code_fences("```\n[]\n```  "), "[]");
        assert_eq!(strip_code_fences("  [\"x\"] "), "[\"x\"]");
    }

    #[test]
    fn test_extract_svg_from_fenced_reply() {
        let text = "Here you go:\n```svg\n<svg viewBox=\"0 0 300 200\"><circle r=\"5\"/></svg>\n```";
        assert_eq!(
            extract_svg(text).as_deref(),
            Some("<svg viewBox=\"0 0 300 200\"><circle r=\"5\"/></svg>")
        );
    }

    #[test]
    fn test_extract_svg_without_markup() {
        assert!(extract_svg("I cannot draw that.").is_none());
    }
}
