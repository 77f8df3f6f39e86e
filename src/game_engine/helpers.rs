//! Small shared routines used by the loaders and the subsystems.
//!
//! ## RNG ordering
//!
//! Every random draw in a session goes through the one `StdRng` the session
//! owns. The helpers here consume it in a fixed order (one draw per swap in
//! `shuffle`, one per pick in `pick_with_replacement`) so that a seeded
//! session replays identically. Changing that order breaks determinism tests.

use rand::Rng;

/// Strip the stray markup (`[`, `]`, `` ` ``, `'`) that authoring tools leave
/// in option labels, then trim whitespace.
pub fn sanitize_option(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']' | '`' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Uniform in-place permutation (Fisher-Yates).
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Draw `n` items uniformly, with replacement. Returns an empty vec when
/// `pool` is empty.
pub fn pick_with_replacement<T: Clone, R: Rng>(pool: &[T], n: usize, rng: &mut R) -> Vec<T> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..n).map(|_| pool[rng.gen_range(0..pool.len())].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sanitize_strips_markup_and_whitespace() {
        assert_eq!(sanitize_option("  ['Net profit rose'] "), "Net profit rose");
        assert_eq!(sanitize_option("`True`"), "True");
        assert_eq!(sanitize_option("Plain"), "Plain");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted, "50 items left in order by a shuffle");
    }

    #[test]
    fn shuffle_is_deterministic_with_seed() {
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items: Vec<u32> = (0..20).collect();
            shuffle(&mut items, &mut rng);
            items
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn pick_with_replacement_handles_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(pick_with_replacement(&empty, 5, &mut rng).is_empty());
        assert_eq!(pick_with_replacement(&[7u8], 3, &mut rng), vec![7, 7, 7]);
    }
}
