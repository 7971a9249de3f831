//! Letter sets used to draw words and grid cells.

use serde::{Deserialize, Serialize};

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MIXED_CASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    Uppercase,
    #[default]
    MixedCase,
}

impl Alphabet {
    pub fn letters(&self) -> &'static [u8] {
        match self {
            Alphabet::Uppercase => UPPERCASE,
            Alphabet::MixedCase => MIXED_CASE,
        }
    }

    pub fn size(&self) -> usize {
        self.letters().len()
    }

    /// Number of distinct strings with length in `1..=max_len`.
    ///
    /// Saturates at `u128::MAX`, which is far beyond any word count that
    /// fits in memory.
    pub fn distinct_strings(&self, max_len: usize) -> u128 {
        let base = self.size() as u128;
        let mut total: u128 = 0;
        let mut power: u128 = 1;
        for _ in 0..max_len {
            power = power.saturating_mul(base);
            total = total.saturating_add(power);
            if total == u128::MAX {
                break;
            }
        }
        total
    }

    pub fn random_word(&self, rng: &mut fastrand::Rng, len: usize) -> String {
        let letters = self.letters();
        (0..len)
            .map(|_| letters[rng.usize(..letters.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_strings_counts_every_length() {
        assert_eq!(Alphabet::Uppercase.distinct_strings(0), 0);
        assert_eq!(Alphabet::Uppercase.distinct_strings(1), 26);
        assert_eq!(Alphabet::Uppercase.distinct_strings(2), 26 + 26 * 26);
        assert_eq!(Alphabet::MixedCase.distinct_strings(1), 52);
    }

    #[test]
    fn distinct_strings_saturates() {
        assert_eq!(Alphabet::MixedCase.distinct_strings(500), u128::MAX);
    }

    #[test]
    fn random_word_draws_from_alphabet() {
        let mut rng = fastrand::Rng::with_seed(7);
        let word = Alphabet::Uppercase.random_word(&mut rng, 64);
        assert_eq!(word.len(), 64);
        assert!(word.chars().all(|c| c.is_ascii_uppercase()));
    }
}
