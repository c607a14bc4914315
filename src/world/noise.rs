use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Classic 2D Perlin gradient noise over a shuffled permutation table.
/// Output is deterministic for a given table and stays within [-1, 1].
pub struct NoiseField {
    // 256-entry permutation duplicated to 512 so corner lookups never
    // need an explicit wrap.
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        table.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }

        NoiseField { perm }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let cell_x = x.floor();
        let cell_y = y.floor();
        let xf = x - cell_x;
        let yf = y - cell_y;
        let xi = (cell_x as i64 & 255) as usize;
        let yi = (cell_y as i64 & 255) as usize;

        let u = fade(xf);
        let v = fade(yf);

        // Hashes for the four lattice corners around the sample point.
        let aa = self.perm[self.perm[xi] as usize + yi];
        let ab = self.perm[self.perm[xi] as usize + yi + 1];
        let ba = self.perm[self.perm[xi + 1] as usize + yi];
        let bb = self.perm[self.perm[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v)
    }
}

// Quintic smoothing, zero first and second derivative at the cell edges.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

// 4-bit hash folded onto 8 gradient directions. The terrain thresholds
// downstream are tuned against this exact distribution.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 15 {
        0 | 8 => x + y,
        1 | 9 => -x + y,
        2 | 10 => x - y,
        3 | 11 => -x - y,
        4 | 12 => x,
        5 | 13 => -x,
        6 | 14 => y,
        _ => -y,
    }
}
