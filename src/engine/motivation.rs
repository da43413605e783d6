use rand::Rng;
use rand::seq::SliceRandom;

pub const PILOT_QUOTES: &[&str] = &[
    "Attitude determines Altitude. Blijf positief en gefocust.",
    "A good pilot is always learning. Elke fout is een les.",
    "Visualiseer de cockpit. Jij hoort daar thuis.",
    "Vliegen is de kunst van het vooruitdenken. Blijf de situatie voor.",
    "In thrust we trust. Geloof in je eigen kunnen.",
    "Keep the blue side up. Blijf kalm onder druk.",
    "Geen paniek, blijf vliegen. Eerst 'Aviate', dan 'Navigate', dan 'Communicate'.",
    "De beste piloten hebben het meeste geoefend.",
    "Je wordt niet geboren als piloot, je wordt er een door training.",
    "De lucht is niet de limiet, het is jouw speelveld.",
];

pub const LOADING_MESSAGES: &[&str] = &[
    "Pre-flight checks uitvoeren...",
    "Toestemming vragen aan de toren...",
    "Instrumenten kalibreren...",
    "Weerbericht ophalen...",
    "Motor opwarmen...",
    "Route plannen naar succes...",
    "Vluchtplan indienen...",
    "Wings level houden...",
    "Scannen van het luchtruim...",
    "Vragen ophalen uit de black box...",
];

pub const SUCCESS_MESSAGES: &[&str] = &[
    "Strakke landing!",
    "Good Airmanship!",
    "Right on target!",
    "Cleared for takeoff!",
    "Altitude maintained!",
    "Perfecte navigatie!",
    "Roger that!",
    "Captain material!",
];

/// Read-only message pools handed to the app at startup.
#[derive(Clone, Copy, Debug)]
pub struct Motivation {
    pub quotes: &'static [&'static str],
    pub loading: &'static [&'static str],
    pub success: &'static [&'static str],
}

impl Default for Motivation {
    fn default() -> Self {
        Self {
            quotes: PILOT_QUOTES,
            loading: LOADING_MESSAGES,
            success: SUCCESS_MESSAGES,
        }
    }
}

impl Motivation {
    pub fn quote<R: Rng>(&self, rng: &mut R) -> &'static str {
        pick(self.quotes, rng)
    }

    pub fn loading<R: Rng>(&self, rng: &mut R) -> &'static str {
        pick(self.loading, rng)
    }

    pub fn success<R: Rng>(&self, rng: &mut R) -> &'static str {
        pick(self.success, rng)
    }
}

fn pick<R: Rng>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_picks_from_pool() {
        let motivation = Motivation::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let quote = motivation.quote(&mut rng);
        assert!(PILOT_QUOTES.contains(&quote));
        assert!(LOADING_MESSAGES.contains(&motivation.loading(&mut rng)));
    }

    #[test]
    fn test_empty_pool_yields_empty_string() {
        let motivation = Motivation {
            quotes: &[],
            loading: &[],
            success: &[],
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(motivation.success(&mut rng), "");
    }
}
