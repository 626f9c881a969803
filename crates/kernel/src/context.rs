use gardencity_seed::{PrngStream, Seed};

use crate::clock::FrameClock;
use crate::scene::Scene;

/// Everything a generator or per-frame updater needs, passed explicitly.
///
/// Built once per session from the seed. Components borrow the parts they
/// need instead of reaching for a global.
#[derive(Debug)]
pub struct WorldContext {
    seed: Seed,
    pub stream: PrngStream,
    pub scene: Scene,
    pub clock: FrameClock,
}

impl WorldContext {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            stream: PrngStream::new(seed),
            scene: Scene::new(),
            clock: FrameClock::new(),
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }
}
