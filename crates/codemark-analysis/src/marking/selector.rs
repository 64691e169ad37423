//! Backdoor combination selector.
//!
//! Eligible samples are arranged once by a [`SelectionOrder`]; the selection
//! at rate `r` is the first `round(r * n)` of them. Lower-rate selections are
//! therefore always prefixes of higher-rate ones.

use codemark_core::config::{SelectionConfig, SelectionOrderKind};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// How eligible samples are ranked for poisoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionOrder {
    /// Ascending corpus index.
    #[default]
    Index,
    /// Ascending xxh3 hash of the corpus index under `seed`; ties by index.
    Hashed { seed: u64 },
}

impl SelectionOrder {
    pub fn from_config(config: &SelectionConfig) -> Self {
        match config.effective_order() {
            SelectionOrderKind::Index => Self::Index,
            SelectionOrderKind::Hashed => Self::Hashed {
                seed: config.effective_seed(),
            },
        }
    }

    /// Sort corpus indices into selection order.
    pub fn arrange(&self, indices: &mut [usize]) {
        match *self {
            Self::Index => indices.sort_unstable(),
            Self::Hashed { seed } => indices.sort_unstable_by_key(|&i| (rank(i, seed), i)),
        }
    }
}

fn rank(index: usize, seed: u64) -> u64 {
    xxh3_64_with_seed(&(index as u64).to_le_bytes(), seed)
}

/// Number of samples selected out of `eligible` at `rate`.
pub fn selection_size(rate: f64, eligible: usize) -> usize {
    let n = (rate * eligible as f64).round();
    if n <= 0.0 {
        0
    } else {
        (n as usize).min(eligible)
    }
}

/// Corpus indices split into the poisoned selection and the rest, each in
/// ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub poisoned: Vec<usize>,
    pub clean: Vec<usize>,
}

impl Selection {
    pub fn is_selected(&self, index: usize) -> bool {
        self.poisoned.binary_search(&index).is_ok()
    }
}

/// Select the samples to poison among `eligible` corpus indices.
pub fn select(eligible: &[usize], rate: f64, order: SelectionOrder) -> Selection {
    let mut ranked = eligible.to_vec();
    order.arrange(&mut ranked);
    let take = selection_size(rate, ranked.len());
    let mut clean = ranked.split_off(take);
    let mut poisoned = ranked;
    poisoned.sort_unstable();
    clean.sort_unstable();
    Selection { poisoned, clean }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_of_four_is_two() {
        let s = select(&[0, 1, 2, 3], 0.5, SelectionOrder::Index);
        assert_eq!(s.poisoned, vec![0, 1]);
        assert_eq!(s.clean, vec![2, 3]);
        assert!(s.is_selected(1));
        assert!(!s.is_selected(2));
    }

    #[test]
    fn rounding_and_bounds() {
        assert_eq!(selection_size(1.0, 5), 5);
        assert_eq!(selection_size(0.0, 5), 0);
        assert_eq!(selection_size(0.5, 3), 2);
        assert_eq!(selection_size(0.1, 4), 0);
        assert_eq!(selection_size(0.3, 0), 0);
    }

    #[test]
    fn hashed_order_is_seeded_and_stable() {
        let eligible: Vec<usize> = (0..50).collect();
        let a = select(&eligible, 0.2, SelectionOrder::Hashed { seed: 7 });
        let b = select(&eligible, 0.2, SelectionOrder::Hashed { seed: 7 });
        assert_eq!(a, b);
        assert_eq!(a.poisoned.len(), 10);
        let c = select(&eligible, 0.2, SelectionOrder::Hashed { seed: 8 });
        assert_ne!(a.poisoned, c.poisoned);
    }

    #[test]
    fn order_from_config() {
        let config = SelectionConfig {
            order: Some(SelectionOrderKind::Hashed),
            seed: Some(3),
        };
        assert_eq!(SelectionOrder::from_config(&config), SelectionOrder::Hashed { seed: 3 });
        assert_eq!(
            SelectionOrder::from_config(&SelectionConfig::default()),
            SelectionOrder::Index
        );
    }
}
