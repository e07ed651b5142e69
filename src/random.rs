//! Seeded randomness for sketches.
//!
//! Both generators are plain owned values, created fresh for every render. Reproducibility is
//! a function of the seed alone: the same seed and the same script give the same sequence.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 32-bit "mulberry32" generator.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64) as usize;
        i.min(len - 1)
    }
}

/// Clock-derived seed. Nanoseconds are mixed with a per-process counter so that two renders
/// started within the same clock tick still diverge.
pub fn clock_seed() -> u32 {
    static CALLS: AtomicU32 = AtomicU32::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let n = CALLS.fetch_add(1, Ordering::Relaxed);
    let folded = (nanos as u64) ^ ((nanos >> 64) as u64);
    ((folded ^ (folded >> 32)) as u32) ^ n.wrapping_mul(0x9E37_79B9)
}

/// 2D gradient noise over a seeded permutation table.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Build the table with a Fisher–Yates shuffle driven by `rng`.
    pub fn new(rng: &mut SeededRng) -> Self {
        let mut base = [0u8; 256];
        for (i, p) in base.iter_mut().enumerate() {
            *p = i as u8;
        }
        for i in (1..base.len()).rev() {
            let j = rng.index(i + 1);
            base.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&base);
        perm[256..].copy_from_slice(&base);
        Self { perm }
    }

    /// Noise value in `[0, 1)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.5;
        }

        let xf0 = x.floor();
        let yf0 = y.floor();
        let xi = (xf0 as i64 & 255) as usize;
        let yi = (yf0 as i64 & 255) as usize;
        let xf = x - xf0;
        let yf = y - yf0;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        let n = lerp(x1, x2, v);

        ((n + 1.0) * 0.5).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
#[path = "../tests/unit/random.rs"]
mod tests;
