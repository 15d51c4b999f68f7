//! Debris lifecycle
//!
//! Spawns debris in waves beyond the trailing edge, drifts it toward the
//! leading barrier and retires it on exit, decay, capture or a pull hit.
//! Destroying retired debris is a no-op; retired entries are swept at the end
//! of each tick.

use tracing::debug;

use crate::config::SimConfig;
use crate::game::events::{DebrisDestroyCause, SimEvent};
use crate::game::state::{BeamAction, Debris, DebrisKind, EntityId, Player};
use crate::game::systems::player::collect_debris;
use crate::game::systems::SystemContext;
use crate::util::vec2::Vec2;

/// Outcome of a beam pulse touching debris
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamHit {
    /// Debris was captured by the pulse's owner
    Collected,
    /// Debris drift now points away from the owner
    Repelled,
    /// Debris was already retired; the pulse is unaffected
    Missed,
}

#[derive(Debug, Clone, Default)]
pub struct DebrisManager {
    debris: Vec<Debris>,
    /// Ticks since the last ordinary wave
    spawn_timer: u64,
    /// Ticks since the last special wave
    special_timer: u64,
    started: bool,
}

impl DebrisManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the opening batch and arm both wave timers
    pub fn start(&mut self, ctx: &mut SystemContext) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_timer = 0;
        self.special_timer = 0;
        self.spawn_debris(ctx.config.debris.count_on_start, DebrisKind::Ordinary, ctx);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Create `count` debris of `kind` at the trailing edge
    pub fn spawn_debris(&mut self, count: usize, kind: DebrisKind, ctx: &mut SystemContext) {
        let config = ctx.config;
        let field = &config.field;
        for _ in 0..count {
            let y = ctx.rng.random_in_range(field.spawn_y_min, field.spawn_y_max) as f32;
            let debris = Debris::spawn(
                ctx.ids.next_id(),
                Vec2::new(field.spawn_x(), y),
                kind,
                &config.debris,
                ctx.rng,
            );
            self.insert(debris, ctx.events);
        }
        debug!("Spawned {} {:?} debris, {} live", count, kind, self.live_count());
    }

    /// Register debris created elsewhere (scripted placement, replays)
    pub fn insert(&mut self, debris: Debris, events: &mut Vec<SimEvent>) {
        events.push(SimEvent::DebrisSpawned {
            id: debris.id,
            kind: debris.kind,
            source: debris.source(),
            mass: debris.mass(),
            position: debris.position,
        });
        self.debris.push(debris);
    }

    /// Run wave timers, drift, spin and retire debris that left the field or decayed
    pub fn tick(&mut self, ctx: &mut SystemContext) {
        if !self.started {
            return;
        }
        let config = ctx.config;

        self.spawn_timer += 1;
        if self.spawn_timer >= config.debris.spawn_interval_ticks {
            self.spawn_timer = 0;
            self.spawn_debris(config.debris.count_per_interval, DebrisKind::Ordinary, ctx);
        }
        self.special_timer += 1;
        if self.special_timer >= config.debris.special_spawn_interval_ticks {
            self.special_timer = 0;
            self.spawn_debris(config.debris.specials_per_interval, DebrisKind::Special, ctx);
        }

        for debris in self.debris.iter_mut().filter(|d| d.is_alive()) {
            debris.advance(config.debris.spin_per_tick);

            let cause = if out_of_field(debris, config) {
                Some(DebrisDestroyCause::LeftField)
            } else if config.debris.lifetime_ticks.is_some_and(|limit| debris.age > limit) {
                Some(DebrisDestroyCause::Decayed)
            } else {
                None
            };
            if let Some(cause) = cause {
                retire(debris, cause, ctx.events);
            }
        }
    }

    /// Destroy debris by id. Returns false if it was unknown or already retired.
    pub fn destroy(&mut self, id: EntityId, cause: DebrisDestroyCause, events: &mut Vec<SimEvent>) -> bool {
        match self.debris.iter_mut().find(|d| d.id == id) {
            Some(debris) => retire(debris, cause, events),
            None => false,
        }
    }

    /// Craft touched debris: forward the capture, then destroy the debris.
    /// Returns false if the debris was already retired or the player has crashed.
    pub fn on_player_collision(&mut self, id: EntityId, player: &mut Player, events: &mut Vec<SimEvent>) -> bool {
        let Some(debris) = self.get_live(id) else {
            return false;
        };
        let data = debris.collection_data();
        if !collect_debris(player, data, events) {
            return false;
        }
        debug!("Player {:?} collected debris {} ({:?}, {:.3})", player.handle, id, data.source, data.mass);
        self.destroy(id, DebrisDestroyCause::Collected, events)
    }

    /// Beam pulse touched debris. The caller destroys the pulse unless `Missed`.
    pub fn on_projectile_collision(
        &mut self,
        id: EntityId,
        action: BeamAction,
        owner: &mut Player,
        events: &mut Vec<SimEvent>,
    ) -> BeamHit {
        let Some(index) = self.debris.iter().position(|d| d.id == id && d.is_alive()) else {
            return BeamHit::Missed;
        };

        match action {
            BeamAction::Pull => {
                let data = self.debris[index].collection_data();
                collect_debris(owner, data, events);
                retire(&mut self.debris[index], DebrisDestroyCause::PulledIn, events);
                debug!("Debris {} pulled in by {:?}", id, owner.handle);
                BeamHit::Collected
            }
            BeamAction::Push => {
                self.debris[index].repel_from(owner.position.x);
                BeamHit::Repelled
            }
        }
    }

    /// Drop retired entries
    pub fn sweep(&mut self) {
        self.debris.retain(|d| d.is_alive());
    }

    /// Retire everything and disarm the timers
    pub fn reset(&mut self, events: &mut Vec<SimEvent>) {
        for debris in &mut self.debris {
            retire(debris, DebrisDestroyCause::Reset, events);
        }
        self.debris.clear();
        self.spawn_timer = 0;
        self.special_timer = 0;
        self.started = false;
    }

    pub fn get(&self, id: EntityId) -> Option<&Debris> {
        self.debris.iter().find(|d| d.id == id)
    }

    pub fn get_live(&self, id: EntityId) -> Option<&Debris> {
        self.get(id).filter(|d| d.is_alive())
    }

    pub fn live(&self) -> impl Iterator<Item = &Debris> {
        self.debris.iter().filter(|d| d.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }
}

fn out_of_field(debris: &Debris, config: &SimConfig) -> bool {
    debris.position.x < config.field.barrier_x || debris.position.x > config.field.trailing_limit_x()
}

fn retire(debris: &mut Debris, cause: DebrisDestroyCause, events: &mut Vec<SimEvent>) -> bool {
    if !debris.retire() {
        return false;
    }
    events.push(SimEvent::DebrisDestroyed { id: debris.id, cause });
    true
}
