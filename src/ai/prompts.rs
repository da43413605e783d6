use serde_json::{Value, json};

use crate::session::question::{Difficulty, Question};

/// Longest slice of pasted text sent for topic extraction.
pub const MAX_EXTRACT_CHARS: usize = 5000;

pub fn batch_prompt(topic: &str, difficulty: Difficulty, math_mode: bool, count: usize) -> String {
    let mode = if math_mode {
        "Focus op Rekenvaardigheid, Redactiesommen en Cijferreeksen. Vereist hoofdrekenen."
    } else {
        "Focus op Capaciteiten: Syllogismen, Analogieën, Verbaal."
    };
    let venn = if topic.to_lowercase().contains("syllogism") {
        "Bij Syllogismen: beschrijf in de uitleg het Venn-diagram."
    } else {
        ""
    };
    format!(
        "Genereer {count} unieke meerkeuzevragen voor pilotenselectie.\n\
         Onderwerp: {topic}\n\
         Niveau: {}\n\
         {mode}\n\
         {venn}\n\n\
         Format: JSON Array.\n\
         Eisen: 4-6 opties (A-F), 1 goed antwoord, educatieve uitleg.",
        difficulty.as_str()
    )
}

pub fn definitions_prompt(question_text: &str) -> String {
    format!(
        "Definieer kort (max 1 zin) moeilijke luchtvaart/wis/natuurkunde termen uit: \"{question_text}\".\n\
         Geen termen? Antwoord \"NULL\"."
    )
}

pub fn explain_prompt(question: &Question) -> String {
    format!(
        "Geef een stap-voor-stap uitleg voor deze vraag.\n\
         Vraag: \"{}\"\n\
         Antwoord: {}\n\
         Context: {}",
        question.question, question.correct_answer, question.explanation
    )
}

pub fn steps_prompt(question: &Question) -> String {
    format!(
        "Breek de oplossing op in 3-4 stappen. JSON: [{{step: string, hint: string}}]\n\
         Vraag: \"{}\"",
        question.question
    )
}

pub fn verify_prompt(question: &Question) -> String {
    let options = serde_json::to_string(&question.options).unwrap_or_default();
    format!(
        "Check deze vraag en antwoord op fouten. Is {} correct?\n\
         Vraag: \"{}\"\n\
         Opties: {options}",
        question.correct_answer, question.question
    )
}

pub fn extract_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(MAX_EXTRACT_CHARS).collect();
    format!("Haal max 10 educatieve onderwerpen uit deze tekst. JSON Array string. Tekst: {excerpt}")
}

pub fn diagram_prompt(description: &str) -> String {
    format!(
        "Create an SVG XML code string for a Venn Diagram representing this logic:\n\
         \"{description}\"\n\n\
         Requirements:\n\
         - Use <svg> tag with viewBox=\"0 0 300 200\".\n\
         - Circles should have thin strokes (stroke=\"black\") and semi-transparent fills (e.g., fill=\"rgba(255,0,0,0.3)\").\n\
         - Add <text> labels for sets (A, B, C) inside or near circles.\n\
         - Return ONLY the raw SVG string. No markdown code blocks."
    )
}

pub fn batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "topic": { "type": "STRING" },
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Lijst van antwoordopties, bv 'A) 10 graden'"
                },
                "correct_answer": {
                    "type": "STRING",
                    "description": "De letter van het juiste antwoord, bv 'A' of 'B'"
                },
                "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
                "explanation": { "type": "STRING" }
            },
            "required": ["topic", "question", "options", "correct_answer", "difficulty", "explanation"]
        }
    })
}

pub fn steps_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "step": { "type": "STRING" },
                "hint": { "type": "STRING" }
            }
        }
    })
}

pub fn topics_schema() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}
