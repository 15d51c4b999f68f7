//! Simulation session
//!
//! Owns every entity and runs the fixed-step tick:
//!
//! 1. drain the control queue
//! 2. debris lifecycle (waves, drift, exits)
//! 3. player update (fire, rotate, drive)
//! 4. projectile aging and expiry
//! 5. collision dispatch (reported + detected)
//!
//! Each tick returns the [`SimEvent`]s it produced, in order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SimConfig};
use crate::game::control::{ControlEvent, ControlQueue, ControlQueueError, ControlSender};
use crate::game::events::{CollisionEvent, DebrisDestroyCause, ProjectileDestroyCause, SimEvent};
use crate::game::ledger::LedgerSnapshot;
use crate::game::scoring::{self, FinalScore};
use crate::game::state::{
    Debris, DebrisKind, DebrisSource, EntityId, IdAllocator, Player, PlayerHandle, Spin,
};
use crate::game::systems::debris::{BeamHit, DebrisManager};
use crate::game::systems::{collision, player, projectile, SystemContext};
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

/// Handle of the craft every session starts with
pub const PRIMARY_PLAYER: PlayerHandle = PlayerHandle(0);

/// End-of-session report for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub distance: u64,
    pub crashed: bool,
    pub warp_cores: u8,
    pub score: FinalScore,
    pub ledger: LedgerSnapshot,
}

pub struct Simulation {
    config: SimConfig,
    rng: SimRng,
    ids: IdAllocator,
    players: Vec<Player>,
    debris: DebrisManager,
    controls: ControlQueue,
    pending_collisions: Vec<CollisionEvent>,
    /// Events produced between ticks, flushed with the next tick
    outbox: Vec<SimEvent>,
    distance: u64,
    tick: u64,
    started: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = SimRng::from_seed_option(config.seed);
        let players = vec![Player::new(PRIMARY_PLAYER, &config.player)];
        let controls = ControlQueue::new(config.control_queue_capacity);

        Ok(Self {
            config,
            rng,
            ids: IdAllocator::new(),
            players,
            debris: DebrisManager::new(),
            controls,
            pending_collisions: Vec::new(),
            outbox: Vec::new(),
            distance: 0,
            tick: 0,
            started: false,
        })
    }

    /// Sender handle for an input source
    pub fn control_sender(&self) -> ControlSender {
        self.controls.sender()
    }

    /// Queue a control event for the next tick
    pub fn submit(&self, player: PlayerHandle, event: ControlEvent) -> Result<(), ControlQueueError> {
        self.controls.try_submit(player, event)
    }

    /// Queue an overlap reported by an external collision notifier
    pub fn report_collision(&mut self, collision: CollisionEvent) {
        self.pending_collisions.push(collision);
    }

    /// Place a piece of debris directly, bypassing the spawn waves
    pub fn place_debris(&mut self, position: Vec2, mass: f32, source: DebrisSource, kind: DebrisKind) -> EntityId {
        let debris = Debris::new(
            self.ids.next_id(),
            position,
            mass,
            source,
            kind,
            Spin::None,
            &self.config.debris,
        );
        let id = debris.id;
        self.debris.insert(debris, &mut self.outbox);
        id
    }

    /// Advance one fixed step
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.outbox);

        if !self.started {
            self.start(&mut events);
        }

        self.tick += 1;
        let running = !self.is_crashed();
        if running {
            self.distance += 1;
        }

        for message in self.controls.drain() {
            match self.players.get_mut(message.player.index()) {
                Some(target) => player::apply_control(target, message.event, &self.config, &mut events),
                None => anomaly(&mut events, format!("Control {:?} for unknown player {:?}", message.event, message.player)),
            }
        }

        self.debris.tick(&mut SystemContext {
            config: &self.config,
            rng: &mut self.rng,
            ids: &mut self.ids,
            events: &mut events,
        });

        for craft in &mut self.players {
            player::update(craft, &self.config, &mut self.ids, &mut events);
            if self.config.disable_failure {
                collision::clamp_to_corridor(craft, &self.config);
            }
        }

        let dt = self.config.dt();
        for craft in &mut self.players {
            projectile::update(craft, &self.config.cannon, dt, &mut events);
        }

        let mut collisions = std::mem::take(&mut self.pending_collisions);
        if self.config.detect_collisions {
            collisions.extend(collision::detect(&self.players, &self.debris, &self.config));
        }
        for collision in collisions {
            self.dispatch(collision, &mut events);
        }
        self.debris.sweep();
        self.sanitize(&mut events);

        if running {
            events.push(SimEvent::ScoreUpdate { distance: self.distance });
        }
        events
    }

    fn start(&mut self, events: &mut Vec<SimEvent>) {
        self.started = true;
        self.debris.start(&mut SystemContext {
            config: &self.config,
            rng: &mut self.rng,
            ids: &mut self.ids,
            events,
        });
        info!(
            "Session started at {} Hz with {} debris",
            self.config.tick_rate,
            self.debris.live_count()
        );
    }

    fn dispatch(&mut self, collision: CollisionEvent, events: &mut Vec<SimEvent>) {
        match collision {
            CollisionEvent::PlayerDebris { player: handle, debris } => {
                let Some(craft) = self.players.get_mut(handle.index()) else {
                    anomaly(events, format!("Collision with unknown player {:?}", handle));
                    return;
                };
                if !self.debris.on_player_collision(debris, craft, events) {
                    self.check_known_debris(debris, events);
                }
            }
            CollisionEvent::ProjectileDebris { projectile: projectile_id, debris } => {
                let owner = self
                    .players
                    .iter()
                    .position(|p| p.projectiles.iter().any(|pr| pr.id == projectile_id));
                let Some(owner) = owner else {
                    if self.ids.was_issued(projectile_id) {
                        debug!("Projectile {} already gone, ignoring hit", projectile_id);
                    } else {
                        anomaly(events, format!("Collision with unknown projectile {}", projectile_id));
                    }
                    return;
                };

                let craft = &mut self.players[owner];
                let action = craft
                    .projectiles
                    .iter()
                    .find(|pr| pr.id == projectile_id)
                    .map(|pr| pr.action);
                let Some(action) = action else {
                    return;
                };

                match self.debris.on_projectile_collision(debris, action, craft, events) {
                    BeamHit::Missed => self.check_known_debris(debris, events),
                    BeamHit::Collected | BeamHit::Repelled => {
                        if projectile::take(craft, projectile_id).is_some() {
                            events.push(SimEvent::ProjectileDestroyed {
                                id: projectile_id,
                                cause: ProjectileDestroyCause::Hit,
                            });
                        }
                    }
                }
            }
            CollisionEvent::DebrisBoundaryExit { debris } => {
                if !self.debris.destroy(debris, DebrisDestroyCause::LeftField, events) {
                    self.check_known_debris(debris, events);
                }
            }
            CollisionEvent::PlayerPlanet { player: handle } => {
                let distance = self.distance;
                let disable_failure = self.config.disable_failure;
                let Some(craft) = self.players.get_mut(handle.index()) else {
                    anomaly(events, format!("Planet contact for unknown player {:?}", handle));
                    return;
                };
                if disable_failure {
                    collision::clamp_to_corridor(craft, &self.config);
                } else {
                    player::crash(craft, distance, events);
                }
            }
        }
    }

    /// Retired debris is a silent no-op; an id that never existed is an anomaly
    fn check_known_debris(&self, id: EntityId, events: &mut Vec<SimEvent>) {
        if !self.ids.was_issued(id) {
            anomaly(events, format!("Collision with unknown debris {}", id));
        }
    }

    fn sanitize(&mut self, events: &mut Vec<SimEvent>) {
        for craft in &mut self.players {
            if !craft.position.y.is_finite() || !craft.velocity_y.is_finite() {
                anomaly(events, format!("Fixed non-finite drive for player {:?}", craft.handle));
                craft.position.y = self.config.player.start_y;
                craft.velocity_y = 0.0;
            }
            if !craft.rotation.is_finite() {
                anomaly(events, format!("Fixed non-finite rotation for player {:?}", craft.handle));
                craft.rotation = self.config.player.start_rotation;
            }
        }
    }

    /// Reset players, debris, timers and distance. The RNG stream carries on.
    pub fn restart(&mut self) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.outbox);

        self.debris.reset(&mut events);
        for craft in &mut self.players {
            projectile::clear_all(craft, ProjectileDestroyCause::Reset, &mut events);
            *craft = Player::new(craft.handle, &self.config.player);
        }
        let stale = self.controls.drain().len();
        if stale > 0 {
            debug!("Dropped {} queued controls on restart", stale);
        }
        self.pending_collisions.clear();
        self.distance = 0;
        self.tick = 0;
        self.started = false;

        info!("Session restarted");
        events
    }

    pub fn summary(&self) -> SessionSummary {
        let craft = &self.players[PRIMARY_PLAYER.index()];
        SessionSummary {
            ticks: self.tick,
            distance: self.distance,
            crashed: craft.crashed,
            warp_cores: craft.warp_cores,
            score: scoring::score_ledger(self.distance, &craft.ledger),
            ledger: craft.ledger.snapshot(),
        }
    }

    /// True once every craft has crashed
    pub fn is_crashed(&self) -> bool {
        self.players.iter().all(|p| p.crashed)
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self, handle: PlayerHandle) -> Option<&Player> {
        self.players.get(handle.index())
    }

    pub fn debris(&self) -> &DebrisManager {
        &self.debris
    }
}

fn anomaly(events: &mut Vec<SimEvent>, detail: String) {
    warn!("{}", detail);
    events.push(SimEvent::Anomaly { detail });
}
