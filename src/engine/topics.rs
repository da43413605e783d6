pub const DEFAULT_TOPICS: &[&str] = &[
    "Analogieën",
    "Syllogismen",
    "Rekenvaardigheid",
    "Redactiesommen",
    "Cijferreeksen",
    "Verbaal Redeneren",
    "Stroomdiagrammen",
];

const MAX_FALLBACK_TOPICS: usize = 10;

pub fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
}

/// Line-based topic candidates for when extraction finds nothing: trimmed
/// lines longer than 3 and shorter than 50 characters, at most ten.
pub fn fallback_topics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            let len = line.chars().count();
            len > 3 && len < 50
        })
        .take(MAX_FALLBACK_TOPICS)
        .map(str::to_string)
        .collect()
}

/// Append `new` to `existing`, skipping duplicates and keeping first-seen
/// order. Returns how many topics were actually added.
pub fn merge_topics(existing: &mut Vec<String>, new: impl IntoIterator<Item = String>) -> usize {
    let before = existing.len();
    for topic in new {
        let topic = topic.trim().to_string();
        if topic.is_empty() || existing.contains(&topic) {
            continue;
        }
        existing.push(topic);
    }
    existing.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_filters_by_length() {
        let text = "abc\nMeteorologie\n\n   Navigatie  \n".to_string()
            + &"x".repeat(50)
            + "\nAerodynamica";
        assert_eq!(
            fallback_topics(&text),
            vec!["Meteorologie", "Navigatie", "Aerodynamica"]
        );
    }

    #[test]
    fn test_fallback_caps_at_ten() {
        let text: String = (0..15).map(|i| format!("Onderwerp {i}\n")).collect();
        let topics = fallback_topics(&text);
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0], "Onderwerp 0");
    }

    #[test]
    fn test_fallback_of_blank_text_is_empty() {
        assert!(fallback_topics("   \n\n").is_empty());
    }

    #[test]
    fn test_merge_dedupes_and_keeps_order() {
        let mut topics = default_topics();
        let added = merge_topics(
            &mut topics,
            vec![
                "Meteorologie".to_string(),
                "Syllogismen".to_string(),
                "Meteorologie".to_string(),
                " ".to_string(),
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(topics.len(), DEFAULT_TOPICS.len() + 1);
        assert_eq!(topics.last().map(String::as_str), Some("Meteorologie"));
    }
}
