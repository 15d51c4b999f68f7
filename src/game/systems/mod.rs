pub mod collision;
pub mod debris;
pub mod player;
pub mod projectile;

use crate::config::SimConfig;
use crate::game::events::SimEvent;
use crate::game::state::IdAllocator;
use crate::util::rng::SimRng;

/// Session resources a system needs while it runs
pub struct SystemContext<'a> {
    pub config: &'a SimConfig,
    pub rng: &'a mut SimRng,
    pub ids: &'a mut IdAllocator,
    pub events: &'a mut Vec<SimEvent>,
}
