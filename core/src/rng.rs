/// Xorshift32 generator. Small, fast and reproducible across platforms, which is all the
/// simulation needs for spawn angles, asteroid sizes and particle spray.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next() % max
    }

    /// Uniform in `[0, 1)` using the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[min, max)`.
    pub fn next_range_f32(&mut self, min: f32, max: f32) -> f32 {
        debug_assert!(max >= min);
        min + (max - min) * self.next_f32()
    }

    pub fn next_angle(&mut self) -> f32 {
        self.next_f32() * core::f32::consts::TAU
    }

    /// Whole-degree angle in `[0, 360)`, returned in radians.
    pub fn next_degree_angle(&mut self) -> f32 {
        (self.next_int(360) as f32).to_radians()
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift32_sequence() {
        let mut rng = SeededRng::new(12345);
        assert_eq!(rng.next(), 3_299_914_889);
        assert_eq!(rng.next(), 1_827_393_881);
        assert_eq!(rng.next(), 3_883_696_615);
    }

    #[test]
    fn zero_seed_uses_fallback_state() {
        assert_eq!(SeededRng::new(0).state(), SeededRng::new(0xDEAD_BEEF).state());
    }

    #[test]
    fn floats_stay_in_range() {
        let mut rng = SeededRng::new(0xC0FF_EE00);
        for _ in 0..1_000 {
            let unit = rng.next_f32();
            assert!((0.0..1.0).contains(&unit));
            let ranged = rng.next_range_f32(7.5, 22.5);
            assert!((7.5..22.5).contains(&ranged));
            let degrees = rng.next_degree_angle().to_degrees().round();
            assert!((0.0..360.0).contains(&degrees));
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SeededRng::new(7);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }
}
