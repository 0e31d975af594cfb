use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Where a game's random source stands: the seed it started from and how many words have
/// been drawn since.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RngState {
    pub(crate) seed: u64,
    pub(crate) draws: u64,
}

/// GameRng is a seeded random source that counts its draws so a saved game can pick up the
/// exact same sequence of new tiles. Every draw goes through `next_u64`.
#[derive(Clone, Debug)]
pub(crate) struct GameRng {
    seed: u64,
    draws: u64,
    inner: StdRng,
}

impl GameRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub(crate) fn resume(state: RngState) -> Self {
        let mut rng = Self::new(state.seed);
        for _ in 0..state.draws {
            rng.inner.next_u64();
        }
        rng.draws = state.draws;
        log::debug!("resumed rng seed {} at draw {}", state.seed, state.draws);
        rng
    }

    pub(crate) fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            draws: self.draws,
        }
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Always yields zero, so every new tile gets the minimum value.
#[cfg(test)]
pub(crate) struct ZeroRng;

#[cfg(test)]
impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        dest.fill(0);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::fresh(0)]
    #[case::few(3)]
    #[case::many(500)]
    fn resume_continues_the_sequence(#[case] warmup: usize) {
        let mut rng = GameRng::new(42);
        for _ in 0..warmup {
            let _: u32 = rng.gen_range(1..=4);
            let _: u64 = rng.gen();
        }
        rng.fill_bytes(&mut [0u8; 13]);

        let mut resumed = GameRng::resume(rng.state());
        assert_eq!(resumed.state(), rng.state());
        for _ in 0..20 {
            assert_eq!(resumed.gen_range(1..=4u32), rng.gen_range(1..=4u32));
            assert_eq!(resumed.next_u64(), rng.next_u64());
        }
    }

    #[test]
    fn every_draw_is_counted() {
        let mut rng = GameRng::new(7);
        rng.next_u32();
        rng.next_u64();
        // 13 bytes take two words
        rng.fill_bytes(&mut [0u8; 13]);
        assert_eq!(rng.state(), RngState { seed: 7, draws: 4 });
    }

    #[test]
    fn same_seed_same_sequence() {
        let (mut a, mut b) = (GameRng::new(9), GameRng::new(9));
        for _ in 0..5 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_ne!(GameRng::new(10).next_u64(), GameRng::new(9).next_u64());
    }
}
