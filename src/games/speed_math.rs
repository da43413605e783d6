use std::time::Instant;

use rand::Rng;

use crate::games::{Feedback, advance_due};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Add,
    Sub,
    Mul,
    Frac,
}

impl Family {
    pub const ALL: [Family; 4] = [Family::Add, Family::Sub, Family::Mul, Family::Frac];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub text: String,
    pub answer: String,
    pub explanation: String,
}

impl Problem {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let family = Family::ALL[rng.gen_range(0..Family::ALL.len())];
        Self::of_family(family, rng)
    }

    pub fn of_family<R: Rng>(family: Family, rng: &mut R) -> Self {
        match family {
            Family::Add => {
                let a = rng.gen_range(10..=99);
                let b = rng.gen_range(10..=99);
                Self::whole(format!("{a} + {b}"), a + b)
            }
            Family::Sub => {
                let a: i32 = rng.gen_range(20..=119);
                let b = rng.gen_range(5..a - 5);
                Self::whole(format!("{a} - {b}"), a - b)
            }
            Family::Mul => {
                let a = rng.gen_range(2..=15);
                let b = rng.gen_range(2..=11);
                Self::whole(format!("{a} × {b}"), a * b)
            }
            Family::Frac => {
                if rng.gen_bool(0.5) {
                    let den = rng.gen_range(3..=7);
                    let n1 = rng.gen_range(1..den);
                    let n2 = rng.gen_range(1..den);
                    let answer = format!("{}/{den}", n1 + n2);
                    Self {
                        text: format!("{n1}/{den} + {n2}/{den}"),
                        explanation: format!("{n1}/{den} + {n2}/{den} = {answer}"),
                        answer,
                    }
                } else {
                    let (n1, d1) = (rng.gen_range(1..=3), rng.gen_range(2..=4));
                    let (n2, d2) = (rng.gen_range(1..=3), rng.gen_range(2..=4));
                    let answer = format!("{}/{}", n1 * n2, d1 * d2);
                    Self {
                        text: format!("{n1}/{d1} × {n2}/{d2}"),
                        explanation: format!("Teller × teller, noemer × noemer: {answer}"),
                        answer,
                    }
                }
            }
        }
    }

    fn whole(text: String, value: i32) -> Self {
        Self {
            explanation: format!("{text} = {value}"),
            text,
            answer: value.to_string(),
        }
    }

    pub fn check(&self, answer: &str) -> bool {
        answer.trim() == self.answer
    }
}

/// Arithmetic drill. Score and streak live only as long as the screen.
#[derive(Clone, Debug)]
pub struct SpeedMath {
    pub problem: Problem,
    pub input: String,
    pub feedback: Option<Feedback>,
    pub score: u32,
    pub streak: u32,
    correct_at: Option<Instant>,
}

impl SpeedMath {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            problem: Problem::generate(rng),
            input: String::new(),
            feedback: None,
            score: 0,
            streak: 0,
            correct_at: None,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.feedback == Some(Feedback::Correct) {
            return;
        }
        if ch.is_ascii_digit() || ch == '/' || ch == '-' {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Enter: check the answer, or after a wrong answer move on.
    pub fn submit<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<Feedback> {
        match self.feedback {
            Some(Feedback::Correct) => return None,
            Some(Feedback::Incorrect) => {
                self.next_problem(rng);
                return None;
            }
            None => {}
        }
        if self.input.trim().is_empty() {
            return None;
        }
        let feedback = if self.problem.check(&self.input) {
            self.score += 1;
            self.streak += 1;
            self.correct_at = Some(now);
            Feedback::Correct
        } else {
            self.streak = 0;
            Feedback::Incorrect
        };
        self.feedback = Some(feedback);
        Some(feedback)
    }

    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        if advance_due(self.correct_at, now) {
            self.next_problem(rng);
        }
    }

    pub fn next_problem<R: Rng>(&mut self, rng: &mut R) {
        self.problem = Problem::generate(rng);
        self.input.clear();
        self.feedback = None;
        self.correct_at = None;
    }
}
