//! Seeded pseudo-random numbers for dot sampling.
//!
//! Each [`RenderSession`][crate::session::RenderSession] owns one [`Rng`], so two sessions never
//! share random state and a session replays exactly given the same seed.

use std::num::Wrapping;

// Linear congruential generator parameters
const MUL: u64 = 6364136223846793005; // Knuth section 3.3.4 (p.108)
const INC: u64 = 1442695040888963407;

#[derive(Debug, Clone, PartialEq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Derives the initial state from an arbitrary byte string. Any length works, including empty.
    pub fn from_seed(seed: &[u8]) -> Rng {
        // Each half of the state is a murmur2 hash of the seed, byte-swapped so that the
        // state is the same on every platform.
        let lower = murmur2(seed, 1690382925).swap_bytes();
        let upper = murmur2(seed, 72970470).swap_bytes();
        let state = u64::from(lower) | (u64::from(upper) << 32);
        Rng { state }
    }

    /// Picks a random value uniformly distributed between `0.0` (inclusive) and `1.0` (exclusive).
    pub fn rnd(&mut self) -> f64 {
        let old_state = self.state;
        // Advance internal state.
        self.state = old_state.wrapping_mul(MUL).wrapping_add(INC);
        // Calculate output function (XSH RR) using the old state.
        // PCG-XSH-RR (O'Neill 2014, section 6.3.1), except that 3 bits are masked off during the
        // xorshift. Existing seeds depend on this, so keep it.
        let xorshifted = ((((old_state >> 18) & !(3 << 30)) ^ old_state) >> 27) as u32;
        let fac = xorshifted.rotate_right((old_state >> 59) as u32);
        2.0f64.powi(-32) * f64::from(fac)
    }

    /// Picks an integer uniformly distributed in `0..n`, as `floor(rnd() * n)`.
    ///
    /// Returns `0` when `n` is zero.
    pub fn below(&mut self, n: usize) -> usize {
        (self.rnd() * n as f64) as usize
    }

    /// Picks an integer uniformly distributed in `-span..span`.
    ///
    /// ```rust
    /// use tenbyou::rand::Rng;
    /// let mut rng = Rng::from_seed(b"");
    /// let offsets: [i32; 4] = std::array::from_fn(|_| rng.offset(60));
    /// assert!(offsets.iter().all(|d| (-60..60).contains(d)));
    /// ```
    pub fn offset(&mut self, span: u32) -> i32 {
        self.below(2 * span as usize) as i32 - span as i32
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_seed_state() {
        assert_eq!(Rng::from_seed(b"").state, 0x381a85e943aeeb00);
        assert_eq!(
            Rng::from_seed(&hex!(
                "efa7bdd92b5e9cd9de9b54ac0e3dc60623f1c989a80ed9c5157fffff10c2a148"
            ))
            .state,
            0x506997572177a894
        );
    }

    #[test]
    fn test_rnd_sequence() {
        let mut rng = Rng::from_seed(b"");
        let us: [f64; 8] = std::array::from_fn(|_| rng.rnd());
        assert_eq!(
            us,
            [
                0.8438512671273202,
                0.43491613143123686,
                0.26782758394256234,
                0.9794597257860005,
                0.8957886048592627,
                0.5943453973159194,
                0.07430003909394145,
                0.37728449678979814
            ]
        );

        let mut rng = Rng::from_seed(&hex!(
            "efa7bdd92b5e9cd9de9b54ac0e3dc60623f1c989a80ed9c5157fffff10c2a148"
        ));
        let us: [f64; 8] = std::array::from_fn(|_| rng.rnd());
        assert_eq!(
            us,
            [
                0.40630031237378716,
                0.590646798722446,
                0.5958091835491359,
                0.09100268967449665,
                0.9242822963278741,
                0.808205850655213,
                0.7671284528914839,
                0.9752047171350569
            ]
        );
    }

    #[test]
    fn test_below_sequence() {
        let mut rng = Rng::from_seed(b"");
        let vs: [usize; 8] = std::array::from_fn(|_| rng.below(100));
        assert_eq!(vs, [84, 43, 26, 97, 89, 59, 7, 37]);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn test_offset_sequence() {
        let mut rng = Rng::from_seed(b"");
        let vs: [i32; 8] = std::array::from_fn(|_| rng.offset(60));
        assert_eq!(vs, [41, -8, -28, 57, 47, 11, -52, -15]);
    }

    #[test]
    fn test_offset_range() {
        let mut rng = Rng::from_seed(&hex!("00ff"));
        for _ in 0..10000 {
            let d = rng.offset(60);
            if !(-60..60).contains(&d) {
                panic!("offset(60): got {}", d);
            }
        }
    }

    #[test]
    fn test_independent_streams() {
        let mut a = Rng::from_seed(b"same");
        let mut b = Rng::from_seed(b"same");
        a.rnd();
        let mut c = a.clone();
        assert_eq!(a.rnd(), c.rnd());
        assert_ne!(b.rnd(), c.rnd());
    }
}

fn murmur2(bytes: &[u8], seed: u32) -> u32 {
    const K: usize = 16;
    const MASK: Wrapping<u32> = Wrapping(0xffff);
    const MASK_BYTE: Wrapping<u32> = Wrapping(0xff);
    const M: Wrapping<u32> = Wrapping(0x5bd1e995);

    let mut l: usize = bytes.len();
    let mut h = Wrapping(seed ^ (l as u32));
    let mut i = 0;

    let byte32 = |i: usize| Wrapping(u32::from(bytes[i]));

    while l >= 4 {
        let mut k = (byte32(i) & MASK_BYTE)
            | ((byte32(i + 1) & MASK_BYTE) << 8)
            | ((byte32(i + 2) & MASK_BYTE) << 16)
            | ((byte32(i + 3) & MASK_BYTE) << 24);
        i += 4;
        k = (k & MASK) * M + ((((k >> K) * M) & MASK) << K);
        k ^= k >> 24;
        k = (k & MASK) * M + ((((k >> K) * M) & MASK) << K);
        h = ((h & MASK) * M + ((((h >> K) * M) & MASK) << K)) ^ k;
        l -= 4;
    }
    if l >= 3 {
        h ^= (byte32(i + 2) & MASK_BYTE) << K;
    }
    if l >= 2 {
        h ^= (byte32(i + 1) & MASK_BYTE) << 8;
    }
    if l >= 1 {
        h ^= byte32(i) & MASK_BYTE;
        h = (h & MASK) * M + ((((h >> K) * M) & MASK) << K);
    }

    h ^= h >> 13;
    h = (h & MASK) * M + ((((h >> K) * M) & MASK) << K);
    h ^= h >> 15;

    h.0
}
