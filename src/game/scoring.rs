//! Combo-weighted scoring.

use super::hit::HitOutcome;

/// Combo multiplier never exceeds this
pub const MAX_COMBO_MULTIPLIER: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub shots: u32,
    pub hits: u32,
}

impl ScoreState {
    /// Hit percentage; 100 before the first shot
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            return 100.0;
        }
        self.hits as f64 / self.shots as f64 * 100.0
    }

    pub fn multiplier(&self) -> u32 {
        self.combo.clamp(1, MAX_COMBO_MULTIPLIER)
    }
}

/// Final numbers of a finished round, handed to persistence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub final_score: u64,
    pub accuracy: f64,
    pub hits: u32,
    pub shots: u32,
}

impl From<ScoreState> for RoundSummary {
    fn from(state: ScoreState) -> Self {
        Self {
            final_score: state.score,
            accuracy: state.accuracy(),
            hits: state.hits,
            shots: state.shots,
        }
    }
}

/// Owns the running score for one round
#[derive(Debug, Default)]
pub struct ScoringEngine {
    state: ScoreState,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one resolved shot into the score. Returns points awarded.
    pub fn apply_outcome(&mut self, outcome: HitOutcome) -> u64 {
        self.state.shots += 1;

        match outcome {
            HitOutcome::Hit { points, .. } => {
                self.state.hits += 1;
                self.state.combo += 1;
                let awarded = points as u64 * self.state.combo.min(MAX_COMBO_MULTIPLIER) as u64;
                self.state.score += awarded;
                awarded
            }
            HitOutcome::Miss => {
                self.state.combo = 0;
                0
            }
        }
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn accuracy(&self) -> f64 {
        self.state.accuracy()
    }

    pub fn reset(&mut self) {
        self.state = ScoreState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::target::TargetId;

    fn hit(points: u32) -> HitOutcome {
        HitOutcome::Hit {
            target_id: TargetId(1),
            points,
        }
    }

    #[test]
    fn test_combo_sequence() {
        let mut engine = ScoringEngine::new();
        engine.apply_outcome(hit(10));
        engine.apply_outcome(hit(10));
        engine.apply_outcome(hit(10));
        assert_eq!(engine.state().score, 60);
        assert_eq!(engine.state().combo, 3);

        engine.apply_outcome(HitOutcome::Miss);
        assert_eq!(engine.state().combo, 0);

        assert_eq!(engine.apply_outcome(hit(10)), 10);
        assert_eq!(engine.state().score, 70);
    }

    #[test]
    fn test_multiplier_caps_at_ten() {
        let mut engine = ScoringEngine::new();
        for _ in 0..10 {
            engine.apply_outcome(hit(10));
        }
        assert_eq!(engine.apply_outcome(hit(10)), 100);
        assert_eq!(engine.apply_outcome(hit(10)), 100);
        assert_eq!(engine.state().combo, 12);
        assert_eq!(engine.state().multiplier(), 10);
    }

    #[test]
    fn test_accuracy() {
        let mut engine = ScoringEngine::new();
        assert_eq!(engine.accuracy(), 100.0);

        engine.apply_outcome(HitOutcome::Miss);
        assert_eq!(engine.accuracy(), 0.0);

        engine.apply_outcome(hit(10));
        engine.apply_outcome(hit(10));
        engine.apply_outcome(HitOutcome::Miss);
        assert_eq!(engine.accuracy(), 50.0);
        assert_eq!(engine.state().shots, 4);
        assert_eq!(engine.state().hits, 2);
    }

    #[test]
    fn test_summary_from_state() {
        let mut engine = ScoringEngine::new();
        engine.apply_outcome(hit(20));
        engine.apply_outcome(HitOutcome::Miss);

        let summary = RoundSummary::from(engine.state());
        assert_eq!(summary.final_score, 20);
        assert_eq!(summary.accuracy, 50.0);
        assert_eq!((summary.hits, summary.shots), (1, 2));
    }

    #[test]
    fn test_reset() {
        let mut engine = ScoringEngine::new();
        engine.apply_outcome(hit(30));
        engine.reset();
        assert_eq!(engine.state(), ScoreState::default());
        assert_eq!(engine.accuracy(), 100.0);
    }
}
