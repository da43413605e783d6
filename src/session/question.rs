use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub topic: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl Question {
    /// Answer labels, one per option ("A) 10 kg" -> "A").
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|opt| option_label(opt)).collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.options.iter().any(|opt| option_label(opt) == label)
    }

    pub fn is_correct(&self, label: &str) -> bool {
        label == self.correct_answer
    }

    /// A generated question is usable when it has options and its correct
    /// answer names one of them.
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && !self.options.is_empty()
            && self.has_label(&self.correct_answer)
    }

    pub fn is_syllogism(&self) -> bool {
        self.topic.to_lowercase().contains("syllogism")
    }
}

pub fn option_label(option: &str) -> String {
    option
        .trim_start()
        .chars()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedQuestion {
    pub id: String,
    #[serde(flatten)]
    pub question: Question,
    pub user_answer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SavedQuestion {
    pub fn answered(question: &Question, user_answer: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question: question.clone(),
            user_answer: Some(user_answer.to_string()),
            timestamp: Utc::now(),
        }
    }

    pub fn was_correct(&self) -> bool {
        self.user_answer.as_deref() == Some(self.question.correct_answer.as_str())
    }
}

#[cfg(test)]
pub(crate) fn sample_question(topic: &str, difficulty: Difficulty, correct: &str) -> Question {
    Question {
        topic: topic.to_string(),
        question: "Vinger staat tot Hand als Blad staat tot ...".to_string(),
        options: vec![
            "A) Boom".to_string(),
            "B) Tak".to_string(),
            "C) Bos".to_string(),
            "D) Groen".to_string(),
        ],
        correct_answer: correct.to_string(),
        difficulty,
        explanation: "Een vinger zit aan een hand, een blad aan een tak.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_from_options() {
        let q = sample_question("Analogieën", Difficulty::Easy, "B");
        assert_eq!(q.labels(), vec!["A", "B", "C", "D"]);
        assert!(q.has_label("D"));
        assert!(!q.has_label("E"));
    }

    #[test]
    fn test_correctness_is_exact_match() {
        let q = sample_question("Analogieën", Difficulty::Easy, "B");
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("b"));
        assert!(!q.is_correct("B "));
    }

    #[test]
    fn test_well_formed_requires_matching_label() {
        let mut q = sample_question("Analogieën", Difficulty::Easy, "B");
        assert!(q.is_well_formed());
        q.correct_answer = "F".to_string();
        assert!(!q.is_well_formed());
        q.options.clear();
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_saved_question_serializes_flat() {
        let q = sample_question("Syllogismen", Difficulty::Hard, "C");
        let saved = SavedQuestion::answered(&q, "A");
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["topic"], "Syllogismen");
        assert_eq!(json["difficulty"], "Hard");
        assert_eq!(json["user_answer"], "A");
        assert!(!saved.was_correct());
        assert!(q.is_syllogism());
    }
}
