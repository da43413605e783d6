use std::time::Instant;

use rand::Rng;

use crate::games::{Feedback, advance_due};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    pub fn as_str(self) -> &'static str {
        match self {
            Turn::Left => "LEFT",
            Turn::Right => "RIGHT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompassProblem {
    pub heading: u16,
    pub turn: Turn,
    pub amount: u16,
}

impl CompassProblem {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self {
            heading: rng.gen_range(0..36) * 10,
            turn: if rng.gen_bool(0.5) { Turn::Left } else { Turn::Right },
            amount: rng.gen_range(1..=18) * 10,
        }
    }

    /// Heading after the turn, in 0..360.
    pub fn expected(&self) -> u16 {
        match self.turn {
            Turn::Right => (self.heading + self.amount) % 360,
            Turn::Left => (self.heading + 360 - self.amount) % 360,
        }
    }

    /// 360 and 0 name the same heading.
    pub fn accepts(&self, answer: u16) -> bool {
        let expected = self.expected();
        answer == expected || (answer == 360 && expected == 0)
    }
}

#[derive(Clone, Debug)]
pub struct CompassGame {
    pub problem: CompassProblem,
    pub input: String,
    pub feedback: Option<Feedback>,
    pub score: u32,
    correct_at: Option<Instant>,
}

impl CompassGame {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            problem: CompassProblem::generate(rng),
            input: String::new(),
            feedback: None,
            score: 0,
            correct_at: None,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.feedback == Some(Feedback::Correct) || !ch.is_ascii_digit() || self.input.len() >= 3 {
            return;
        }
        self.input.push(ch);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// A wrong heading clears the input so the same turn can be retried.
    pub fn submit(&mut self, now: Instant) -> Option<Feedback> {
        if self.feedback == Some(Feedback::Correct) || self.input.trim().is_empty() {
            return None;
        }
        let correct = self
            .input
            .trim()
            .parse::<u16>()
            .is_ok_and(|answer| self.problem.accepts(answer));
        let feedback = if correct {
            self.score += 1;
            self.correct_at = Some(now);
            Feedback::Correct
        } else {
            self.input.clear();
            Feedback::Incorrect
        };
        self.feedback = Some(feedback);
        Some(feedback)
    }

    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        if advance_due(self.correct_at, now) {
            self.problem = CompassProblem::generate(rng);
            self.input.clear();
            self.feedback = None;
            self.correct_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn problem(heading: u16, turn: Turn, amount: u16) -> CompassProblem {
        CompassProblem {
            heading,
            turn,
            amount,
        }
    }

    #[test]
    fn test_expected_wraps_both_ways() {
        assert_eq!(problem(350, Turn::Right, 30).expected(), 20);
        assert_eq!(problem(20, Turn::Left, 40).expected(), 340);
        assert_eq!(problem(90, Turn::Left, 90).expected(), 0);
        assert_eq!(problem(180, Turn::Right, 180).expected(), 0);
    }

    #[test]
    fn test_zero_and_360_are_equivalent() {
        let p = problem(90, Turn::Left, 90);
        assert!(p.accepts(0));
        assert!(p.accepts(360));
        assert!(!p.accepts(90));
        assert!(!problem(100, Turn::Right, 10).accepts(470));
    }

    #[test]
    fn test_generated_ranges() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..300 {
            let p = CompassProblem::generate(&mut rng);
            assert!(p.heading <= 350 && p.heading % 10 == 0);
            assert!((10..=180).contains(&p.amount) && p.amount % 10 == 0);
            assert!(p.expected() < 360);
        }
    }

    #[test]
    fn test_wrong_answer_clears_input_for_retry() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut game = CompassGame::new(&mut rng);
        game.problem = problem(10, Turn::Right, 20);
        for ch in "999".chars() {
            game.type_char(ch);
        }
        assert_eq!(game.submit(Instant::now()), Some(Feedback::Incorrect));
        assert!(game.input.is_empty());
        assert_eq!(game.problem.heading, 10);

        game.input = "30".to_string();
        let t0 = Instant::now();
        assert_eq!(game.submit(t0), Some(Feedback::Correct));
        assert_eq!(game.score, 1);
        game.tick(t0 + Duration::from_secs(1), &mut rng);
        assert_eq!(game.feedback, None);
    }
}
