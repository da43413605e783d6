use std::time::Instant;

use rand::Rng;

use crate::games::compass::CompassGame;
use crate::games::memory::MemoryGame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drill {
    Memory,
    Compass,
}

impl Drill {
    pub const ALL: [Drill; 2] = [Drill::Memory, Drill::Compass];

    pub fn title(self) -> &'static str {
        match self {
            Drill::Memory => "Cockpit Memory",
            Drill::Compass => "Compass & Turns",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Drill::Memory => "Remember an ATC transmission and read back altitude, heading and speed.",
            Drill::Compass => "Work out the new heading after a turn as fast as you can.",
        }
    }
}

#[derive(Clone, Debug)]
pub enum CapacityMode {
    Menu,
    Memory(MemoryGame),
    Compass(CompassGame),
}

/// Capacity trainer screen: a drill picker plus the running drill.
#[derive(Clone, Debug)]
pub struct CapacityTrainer {
    pub mode: CapacityMode,
    pub selected: usize,
}

impl Default for CapacityTrainer {
    fn default() -> Self {
        Self {
            mode: CapacityMode::Menu,
            selected: 0,
        }
    }
}

impl CapacityTrainer {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Drill::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Drill::ALL.len() - 1) % Drill::ALL.len();
    }

    pub fn selected_drill(&self) -> Drill {
        Drill::ALL[self.selected.min(Drill::ALL.len() - 1)]
    }

    pub fn start<R: Rng>(&mut self, drill: Drill, rng: &mut R, now: Instant) {
        self.mode = match drill {
            Drill::Memory => CapacityMode::Memory(MemoryGame::new(rng, now)),
            Drill::Compass => CapacityMode::Compass(CompassGame::new(rng)),
        };
    }

    /// Leave the running drill. Returns false when already on the picker.
    pub fn stop(&mut self) -> bool {
        if matches!(self.mode, CapacityMode::Menu) {
            return false;
        }
        self.mode = CapacityMode::Menu;
        true
    }

    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        match &mut self.mode {
            CapacityMode::Menu => {}
            CapacityMode::Memory(game) => game.tick(now),
            CapacityMode::Compass(game) => game.tick(now, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_start_and_stop_drill() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut trainer = CapacityTrainer::default();
        assert!(!trainer.stop());

        trainer.select_next();
        assert_eq!(trainer.selected_drill(), Drill::Compass);
        trainer.start(trainer.selected_drill(), &mut rng, Instant::now());
        assert!(matches!(trainer.mode, CapacityMode::Compass(_)));

        assert!(trainer.stop());
        assert!(matches!(trainer.mode, CapacityMode::Menu));
    }

    #[test]
    fn test_selection_wraps() {
        let mut trainer = CapacityTrainer::default();
        trainer.select_prev();
        assert_eq!(trainer.selected_drill(), Drill::Compass);
        trainer.select_next();
        assert_eq!(trainer.selected_drill(), Drill::Memory);
    }
}
