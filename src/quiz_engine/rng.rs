//! Seeded pseudo-random stream and the sampling helpers built on it.
//!
//! Every question is a pure function of its seed, so the draw sequence is
//! part of the contract: each helper documents exactly how many draws it
//! consumes. Changing a helper's draw count changes every seeded question
//! downstream of it.

use rand::{Rng, RngCore, SeedableRng};

/// Mulberry32: one 32-bit word of state, xor/shift/multiply mixing with
/// wrapping arithmetic.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: i32) -> Self {
        Mulberry32 { state: seed as u32 }
    }

    /// Next float in `[0, 1)`. One draw.
    pub fn draw(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// A coin flip; one draw.
    pub fn chance(&mut self, p: f64) -> bool {
        self.draw() < p
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Mulberry32::new(i32::from_le_bytes(seed))
    }
}

/// Mint a seed from OS entropy for callers that did not supply one.
pub fn fresh_seed() -> i32 {
    rand::thread_rng().gen::<i32>()
}

/// Uniform integer in `[min, max]`. One draw, plus one per rejected zero
/// when `exclude_zero` is set.
///
/// Panics if `exclude_zero` is set and the range is `{0}`.
pub fn random_int(rng: &mut Mulberry32, min: i32, max: i32, exclude_zero: bool) -> i32 {
    assert!(min <= max, "random_int: empty range {min}..={max}");
    assert!(
        !(exclude_zero && min == 0 && max == 0),
        "random_int: range {{0}} cannot exclude zero"
    );
    let span = (max as i64 - min as i64 + 1) as f64;
    loop {
        let value = ((rng.draw() * span).floor() as i64 + min as i64) as i32;
        if !exclude_zero || value != 0 {
            return value;
        }
    }
}

/// Uniform pick by index. One draw.
///
/// Panics on an empty slice.
pub fn random_choice<'a, T>(rng: &mut Mulberry32, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty(), "random_choice: empty slice");
    let idx = (rng.draw() * items.len() as f64).floor() as usize;
    &items[idx.min(items.len() - 1)]
}

/// Fisher-Yates over a copy; `len - 1` draws.
pub fn shuffle<T: Clone>(rng: &mut Mulberry32, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = (rng.draw() * (i + 1) as f64).floor() as usize;
        out.swap(i, j.min(i));
    }
    out
}

/// Up to `count` distinct integers from `[min, max]` without replacement.
/// Returns fewer when the range is exhausted first.
pub fn random_distinct_ints(rng: &mut Mulberry32, min: i32, max: i32, count: usize) -> Vec<i32> {
    let mut candidates: Vec<i32> = (min..=max).collect();
    let mut picked = Vec::with_capacity(count.min(candidates.len()));
    while picked.len() < count && !candidates.is_empty() {
        let idx = (rng.draw() * candidates.len() as f64).floor() as usize;
        picked.push(candidates.remove(idx.min(candidates.len() - 1)));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_identical_stream() {
        let mut a = Mulberry32::new(1234);
        let mut b = Mulberry32::new(1234);
        for _ in 0..1000 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a: Vec<f64> = {
            let mut r = Mulberry32::new(1);
            (0..8).map(|_| r.draw()).collect()
        };
        let b: Vec<f64> = {
            let mut r = Mulberry32::new(2);
            (0..8).map(|_| r.draw()).collect()
        };
        assert_ne!(a, b);
    }

    #[test]
    fn known_first_output_for_seed_zero() {
        // mulberry32(0)() * 2^32
        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_u32(), 1_144_304_738);
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(-77);
        for _ in 0..10_000 {
            let x = rng.draw();
            assert!((0.0..1.0).contains(&x), "draw {x} outside [0,1)");
        }
    }

    #[test]
    fn random_int_respects_bounds() {
        let mut rng = Mulberry32::new(99);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..5_000 {
            let v = random_int(&mut rng, -3, 4, false);
            assert!((-3..=4).contains(&v));
            seen_min |= v == -3;
            seen_max |= v == 4;
        }
        assert!(seen_min && seen_max, "both endpoints should be reachable");
    }

    #[test]
    fn random_int_can_exclude_zero() {
        let mut rng = Mulberry32::new(5);
        for _ in 0..2_000 {
            assert_ne!(random_int(&mut rng, -1, 1, true), 0);
        }
    }

    #[test]
    #[should_panic]
    fn random_choice_panics_on_empty() {
        let mut rng = Mulberry32::new(5);
        let empty: [u8; 0] = [];
        random_choice(&mut rng, &empty);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Mulberry32::new(2024);
        let items: Vec<u32> = (0..20).collect();
        let mut shuffled = shuffle(&mut rng, &items);
        assert_ne!(shuffled, items, "20 items should not shuffle to identity");
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn distinct_ints_are_distinct_and_stop_at_exhaustion() {
        let mut rng = Mulberry32::new(8);
        let picked = random_distinct_ints(&mut rng, 1, 10, 4);
        assert_eq!(picked.len(), 4);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);

        let all = random_distinct_ints(&mut rng, 0, 2, 10);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn seedable_rng_matches_new() {
        let mut a = Mulberry32::from_seed(42i32.to_le_bytes());
        let mut b = Mulberry32::new(42);
        assert_eq!(a.next_u32(), b.next_u32());
    }
}
