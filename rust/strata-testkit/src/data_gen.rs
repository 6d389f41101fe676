//! Seeded generation of test columns.

/// Generates `count` nullable values in `min..=max`, null with probability `null_ratio`.
pub fn random_nullable_values(
    seed: u64,
    count: usize,
    min: i64,
    max: i64,
    null_ratio: f64,
) -> Vec<Option<i64>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| {
            if rng.f64() < null_ratio {
                None
            } else {
                Some(rng.i64(min..=max))
            }
        })
        .collect()
}

/// Generates `count` values with runs of nulls of random lengths in between.
pub fn random_null_runs(seed: u64, count: usize, max_run: usize) -> Vec<Option<i64>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let run = rng.usize(1..=max_run.max(1)).min(count - values.len());
        if rng.bool() {
            values.extend(std::iter::repeat_n(None, run));
        } else {
            values.extend((0..run).map(|_| Some(rng.i64(..))));
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_nullable_values() {
        let values = random_nullable_values(7, 1000, -5, 5, 0.3);
        assert_eq!(values.len(), 1000);
        assert!(values.iter().flatten().all(|v| (-5..=5).contains(v)));
        assert!(values.iter().any(Option::is_none));
        assert_eq!(values, random_nullable_values(7, 1000, -5, 5, 0.3));
        assert!(random_nullable_values(1, 10, 0, 1, 1.0).iter().all(Option::is_none));
    }

    #[test]
    fn test_random_null_runs() {
        let values = random_null_runs(3, 500, 20);
        assert_eq!(values.len(), 500);
        assert!(random_null_runs(3, 0, 20).is_empty());
    }
}
