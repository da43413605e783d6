use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;

pub const MEMORIZE_TIME: Duration = Duration::from_secs(5);

const AIRLINES: &[&str] = &["KLM", "TRA", "EZY", "BAW", "DLH"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transmission {
    pub callsign: String,
    pub altitude: u32,
    pub heading: u32,
    pub speed: u32,
}

impl Transmission {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let airline = AIRLINES.choose(rng).copied().unwrap_or("KLM");
        Self {
            callsign: format!("{airline} {}", rng.gen_range(100..=998)),
            altitude: rng.gen_range(10..=39) * 1000,
            heading: rng.gen_range(0..=35) * 10,
            speed: rng.gen_range(15..=34) * 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Altitude,
    Heading,
    Speed,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Altitude, Field::Heading, Field::Speed];

    fn index(self) -> usize {
        match self {
            Field::Altitude => 0,
            Field::Heading => 1,
            Field::Speed => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Altitude => "Altitude (ft)",
            Field::Heading => "Heading (°)",
            Field::Speed => "Speed (kts)",
        }
    }
}

/// Per-field result of a readback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readback {
    pub altitude: bool,
    pub heading: bool,
    pub speed: bool,
}

impl Readback {
    pub fn check(transmission: &Transmission, inputs: &[String; 3]) -> Self {
        let matches = |input: &str, value: u32| input.trim().parse::<u32>() == Ok(value);
        Self {
            altitude: matches(&inputs[0], transmission.altitude),
            heading: matches(&inputs[1], transmission.heading),
            speed: matches(&inputs[2], transmission.speed),
        }
    }

    pub fn all_correct(&self) -> bool {
        self.altitude && self.heading && self.speed
    }

    pub fn field(&self, field: Field) -> bool {
        match field {
            Field::Altitude => self.altitude,
            Field::Heading => self.heading,
            Field::Speed => self.speed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryPhase {
    Memorize,
    Recall,
    Feedback(Readback),
}

#[derive(Clone, Debug)]
pub struct MemoryGame {
    pub transmission: Transmission,
    pub phase: MemoryPhase,
    pub inputs: [String; 3],
    pub focus: Field,
    pub score: u32,
    shown_at: Instant,
}

impl MemoryGame {
    pub fn new<R: Rng>(rng: &mut R, now: Instant) -> Self {
        Self {
            transmission: Transmission::generate(rng),
            phase: MemoryPhase::Memorize,
            inputs: Default::default(),
            focus: Field::Altitude,
            score: 0,
            shown_at: now,
        }
    }

    /// Whole seconds left to memorize, rounded up.
    pub fn seconds_left(&self, now: Instant) -> u64 {
        let left = MEMORIZE_TIME.saturating_sub(now.saturating_duration_since(self.shown_at));
        left.as_millis().div_ceil(1000) as u64
    }

    pub fn tick(&mut self, now: Instant) {
        if self.phase == MemoryPhase::Memorize
            && now.saturating_duration_since(self.shown_at) >= MEMORIZE_TIME
        {
            self.phase = MemoryPhase::Recall;
        }
    }

    pub fn input(&self, field: Field) -> &str {
        &self.inputs[field.index()]
    }

    pub fn type_char(&mut self, ch: char) {
        if self.phase == MemoryPhase::Recall && ch.is_ascii_digit() {
            self.inputs[self.focus.index()].push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == MemoryPhase::Recall {
            self.inputs[self.focus.index()].pop();
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % Field::ALL.len();
        self.focus = Field::ALL[next];
    }

    pub fn focus_prev(&mut self) {
        let prev = (self.focus.index() + Field::ALL.len() - 1) % Field::ALL.len();
        self.focus = Field::ALL[prev];
    }

    /// Submit the readback. Only meaningful during recall.
    pub fn submit(&mut self) -> Option<Readback> {
        if self.phase != MemoryPhase::Recall {
            return None;
        }
        let readback = Readback::check(&self.transmission, &self.inputs);
        if readback.all_correct() {
            self.score += 1;
        }
        self.phase = MemoryPhase::Feedback(readback);
        Some(readback)
    }

    /// Next transmission after the report; score carries over.
    pub fn next<R: Rng>(&mut self, rng: &mut R, now: Instant) {
        let score = self.score;
        *self = Self::new(rng, now);
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn transmission() -> Transmission {
        Transmission {
            callsign: "KLM 123".to_string(),
            altitude: 24000,
            heading: 240,
            speed: 250,
        }
    }

    #[test]
    fn test_generated_ranges() {
        let mut rng = SmallRng::seed_from_u64(12);
        for _ in 0..300 {
            let t = Transmission::generate(&mut rng);
            assert!((10_000..=39_000).contains(&t.altitude) && t.altitude % 1000 == 0);
            assert!(t.heading <= 350 && t.heading % 10 == 0);
            assert!((150..=340).contains(&t.speed) && t.speed % 10 == 0);
            let (airline, number) = t.callsign.split_once(' ').unwrap();
            assert!(AIRLINES.contains(&airline));
            assert!((100..=998).contains(&number.parse::<u32>().unwrap()));
        }
    }

    #[test]
    fn test_readback_compares_each_field() {
        let inputs = ["24000".to_string(), " 240 ".to_string(), "260".to_string()];
        let readback = Readback::check(&transmission(), &inputs);
        assert!(readback.altitude);
        assert!(readback.heading);
        assert!(!readback.speed);
        assert!(!readback.all_correct());
    }

    #[test]
    fn test_memorize_then_recall_then_score() {
        let mut rng = SmallRng::seed_from_u64(4);
        let t0 = Instant::now();
        let mut game = MemoryGame::new(&mut rng, t0);
        game.transmission = transmission();

        game.type_char('1');
        assert_eq!(game.input(Field::Altitude), "");
        assert_eq!(game.seconds_left(t0 + Duration::from_millis(100)), 5);
        game.tick(t0 + Duration::from_secs(4));
        assert_eq!(game.phase, MemoryPhase::Memorize);
        game.tick(t0 + MEMORIZE_TIME);
        assert_eq!(game.phase, MemoryPhase::Recall);

        for (field, value) in [
            (Field::Altitude, "24000"),
            (Field::Heading, "240"),
            (Field::Speed, "250"),
        ] {
            game.focus = field;
            value.chars().for_each(|c| game.type_char(c));
        }
        let readback = game.submit().unwrap();
        assert!(readback.all_correct());
        assert_eq!(game.score, 1);

        game.next(&mut rng, t0 + Duration::from_secs(10));
        assert_eq!(game.phase, MemoryPhase::Memorize);
        assert_eq!(game.score, 1);
        assert!(game.inputs.iter().all(String::is_empty));
    }

    #[test]
    fn test_focus_cycles() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut game = MemoryGame::new(&mut rng, Instant::now());
        game.focus_prev();
        assert_eq!(game.focus, Field::Speed);
        game.focus_next();
        assert_eq!(game.focus, Field::Altitude);
    }
}
