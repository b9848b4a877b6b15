use crate::Page;
use std::{collections::HashMap, hash::Hash};

/// Importance of every page in a corpus. Values sum to 1.
pub type Importance = HashMap<Page, f64, ahash::RandomState>;

/// Probability of moving to each page from a given page. Values sum to 1.
pub type Distribution = HashMap<Page, f64, ahash::RandomState>;

/// Largest absolute value. NaN wins over any number.
pub fn norm_inf<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().fold(0.0, |acc: f64, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            acc.max(x.abs())
        }
    })
}

/// Largest absolute difference between two mappings over the union of their keys.
pub fn max_deviation<K: Eq + Hash>(
    a: &HashMap<K, f64, ahash::RandomState>,
    b: &HashMap<K, f64, ahash::RandomState>,
) -> f64 {
    let from_a = a
        .iter()
        .map(|(k, x)| (x - b.get(k).copied().unwrap_or(0.0)).abs());
    let only_b = b
        .iter()
        .filter(|(k, _)| !a.contains_key(*k))
        .map(|(_, x)| x.abs());
    from_a.chain(only_b).fold(0.0, f64::max)
}

pub(crate) fn renormalize<K: Eq + Hash>(v: &mut HashMap<K, f64, ahash::RandomState>) {
    let total: f64 = v.values().sum();
    if total > 0.0 {
        v.values_mut().for_each(|x| *x /= total);
    }
}
