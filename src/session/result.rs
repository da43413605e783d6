use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    Standard,
    Math,
}

impl SessionMode {
    pub fn from_math_mode(math_mode: bool) -> Self {
        if math_mode {
            SessionMode::Math
        } else {
            SessionMode::Standard
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Standard => "Standard",
            SessionMode::Math => "Math",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub date: DateTime<Utc>,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub average_time: f64,
    pub mode: SessionMode,
}

impl SessionResult {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64 * 100.0
    }
}
