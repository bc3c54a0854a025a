/// Small deterministic generator (SplitMix64) used for stochastic effect state.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Seed a new generator.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Derive an independent stream for `index` (e.g. one per column).
    pub fn fork(seed: u64, index: u64) -> Self {
        Self::new(seed ^ index.wrapping_mul(0xD6E8_FEB8_6659_FD93))
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform value in `[lo, hi)`; returns `lo` when the range is empty.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Poisson-distributed count with the given `mean`, truncated at `limit`.
    ///
    /// Uses Knuth's multiplication method, so the cost is bounded by `limit + 1` draws.
    pub fn poisson(&mut self, mean: f64, limit: usize) -> usize {
        if !mean.is_finite() || mean <= 0.0 || limit == 0 {
            return 0;
        }
        let floor = (-mean).exp();
        let mut k = 0;
        let mut prod = self.next_f64_01();
        while prod > floor && k < limit {
            k += 1;
            prod *= self.next_f64_01();
        }
        k
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/rng.rs"]
mod tests;
