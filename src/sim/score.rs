//! Score keeping
//!
//! The score only grows while a run is active. Reset is the only way down.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    value: u64,
}

impl ScoreKeeper {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn add(&mut self, points: u64) {
        self.value = self.value.saturating_add(points);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_reset() {
        let mut score = ScoreKeeper::default();
        score.add(1);
        score.add(3);
        assert_eq!(score.value(), 4);
        score.add(0);
        assert_eq!(score.value(), 4);
        score.reset();
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_add_saturates() {
        let mut score = ScoreKeeper::default();
        score.add(u64::MAX);
        score.add(5);
        assert_eq!(score.value(), u64::MAX);
    }
}
