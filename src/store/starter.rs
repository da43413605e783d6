use chrono::Utc;
use rust_embed::Embed;
use serde::Deserialize;

use crate::session::question::{Question, SavedQuestion};

#[derive(Embed)]
#[folder = "assets/data/"]
struct StarterAssets;

#[derive(Deserialize)]
struct StarterEntry {
    id: String,
    #[serde(flatten)]
    question: Question,
}

/// Bundled archive used when no saved questions exist yet. None of them has
/// been answered.
pub fn starter_questions() -> Vec<SavedQuestion> {
    let Some(file) = StarterAssets::get("starter_questions.json") else {
        tracing::error!("starter question set is missing from the bundle");
        return Vec::new();
    };
    let entries: Vec<StarterEntry> = match serde_json::from_slice(file.data.as_ref()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("bundled starter questions are invalid: {e}");
            return Vec::new();
        }
    };
    let now = Utc::now();
    entries
        .into_iter()
        .map(|entry| SavedQuestion {
            id: entry.id,
            question: entry.question,
            user_answer: None,
            timestamp: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_set_is_well_formed() {
        let questions = starter_questions();
        assert_eq!(questions.len(), 30);
        assert!(questions.iter().all(|q| q.question.is_well_formed()));
        assert!(questions.iter().all(|q| q.user_answer.is_none()));
    }

    #[test]
    fn test_starter_ids_are_unique() {
        let questions = starter_questions();
        let mut ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), questions.len());
    }
}
