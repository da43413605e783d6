#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rank {
    pub title: &'static str,
    pub min_correct: u32,
    pub bars: u8,
    pub description: &'static str,
}

pub const PILOT_RANKS: &[Rank] = &[
    Rank {
        title: "Flight Cadet",
        min_correct: 0,
        bars: 1,
        description: "Your journey has started. Keep studying!",
    },
    Rank {
        title: "Second Officer",
        min_correct: 25,
        bars: 2,
        description: "You are getting the basics down.",
    },
    Rank {
        title: "First Officer",
        min_correct: 75,
        bars: 3,
        description: "Ready for the right-hand seat.",
    },
    Rank {
        title: "Senior First Officer",
        min_correct: 150,
        bars: 3,
        description: "Experienced and reliable.",
    },
    Rank {
        title: "Captain",
        min_correct: 250,
        bars: 4,
        description: "You are in command. The cockpit is yours.",
    },
];

/// Tiers sorted by ascending `min_correct`; the first tier starts at zero.
#[derive(Clone, Copy, Debug)]
pub struct RankTable {
    ranks: &'static [Rank],
}

impl Default for RankTable {
    fn default() -> Self {
        Self::new(PILOT_RANKS)
    }
}

impl RankTable {
    pub fn new(ranks: &'static [Rank]) -> Self {
        Self { ranks }
    }

    pub fn current(&self, correct: u32) -> Rank {
        self.ranks
            .iter()
            .rev()
            .find(|r| correct >= r.min_correct)
            .or_else(|| self.ranks.first())
            .copied()
            .unwrap_or(PILOT_RANKS[0])
    }

    pub fn next(&self, correct: u32) -> Option<Rank> {
        self.ranks.iter().find(|r| r.min_correct > correct).copied()
    }

    /// Correct answers still needed for the next tier, 0 at the top.
    pub fn needed_for_next(&self, correct: u32) -> u32 {
        self.next(correct)
            .map(|r| r.min_correct - correct)
            .unwrap_or(0)
    }

    pub fn progress_to_next(&self, correct: u32) -> f64 {
        match self.next(correct) {
            Some(next) if next.min_correct > 0 => {
                (correct as f64 / next.min_correct as f64).min(1.0)
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_starts_at_cadet() {
        let table = RankTable::default();
        assert_eq!(table.current(0).title, "Flight Cadet");
        assert_eq!(table.needed_for_next(0), 25);
    }

    #[test]
    fn test_rank_boundaries() {
        let table = RankTable::default();
        assert_eq!(table.current(24).title, "Flight Cadet");
        assert_eq!(table.current(25).title, "Second Officer");
        assert_eq!(table.current(249).title, "Senior First Officer");
        assert_eq!(table.current(1000).title, "Captain");
    }

    #[test]
    fn test_top_rank_has_no_next() {
        let table = RankTable::default();
        assert!(table.next(250).is_none());
        assert_eq!(table.needed_for_next(300), 0);
        assert_eq!(table.progress_to_next(300), 1.0);
    }
}
