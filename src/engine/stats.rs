use serde::{Deserialize, Serialize};

/// Running totals across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
}

impl Stats {
    pub fn record_result(self, correct: bool) -> Self {
        if correct {
            Self {
                correct: self.correct.saturating_add(1),
                incorrect: self.incorrect,
                streak: self.streak.saturating_add(1),
            }
        } else {
            Self {
                correct: self.correct,
                incorrect: self.incorrect.saturating_add(1),
                streak: 0,
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.correct as u64 + self.incorrect as u64
    }

    /// Whole-number accuracy, 0 before the first attempt.
    pub fn accuracy_percent(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.correct as f64 / total as f64 * 100.0).round() as u32
    }

    pub fn accuracy_ratio(&self) -> f64 {
        self.accuracy_percent() as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(results: &[bool]) -> Vec<Stats> {
        let mut stats = Stats::default();
        results
            .iter()
            .map(|&r| {
                stats = stats.record_result(r);
                stats
            })
            .collect()
    }

    #[test]
    fn correct_result_bumps_count_and_streak() {
        let s = Stats::default().record_result(true).record_result(true);
        assert_eq!(s, Stats { correct: 2, incorrect: 0, streak: 2 });
    }

    #[test]
    fn incorrect_result_resets_streak() {
        let s = Stats { correct: 5, incorrect: 1, streak: 5 }.record_result(false);
        assert_eq!(s, Stats { correct: 5, incorrect: 2, streak: 0 });
    }

    #[test]
    fn streak_equals_trailing_run_of_correct_results() {
        let results = [true, true, false, true, false, false, true, true, true];
        let history = replay(&results);
        for (i, stats) in history.iter().enumerate() {
            let trailing = results[..=i].iter().rev().take_while(|&&r| r).count();
            assert_eq!(stats.streak as usize, trailing, "position {i}");
        }
    }

    #[test]
    fn totals_count_every_attempt() {
        let results = [false, true, true, false, true];
        let history = replay(&results);
        for (k, stats) in history.iter().enumerate() {
            assert_eq!(stats.total(), k as u64 + 1);
        }
        assert_eq!(history.last().unwrap().correct, 3);
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        assert_eq!(Stats::default().accuracy_percent(), 0);
        let s = Stats { correct: 2, incorrect: 1, streak: 0 };
        assert_eq!(s.accuracy_percent(), 67);
        let s = Stats { correct: 1, incorrect: 7, streak: 1 };
        assert_eq!(s.accuracy_percent(), 13);
        assert!((s.accuracy_ratio() - 0.13).abs() < f64::EPSILON);
    }
}
