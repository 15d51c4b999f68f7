//! Entity definitions
//!
//! Contains the craft, debris and beam projectiles plus the small value types
//! they exchange. Behaviour that spans entities lives in `game::systems`.

use serde::{Deserialize, Serialize};

use crate::config::{DebrisConfig, PlayerConfig};
use crate::game::constants::player::FACING_OFFSET;
use crate::game::ledger::CollectionLedger;
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

/// Entity identifier for debris and projectiles
pub type EntityId = u64;

/// Non-owning reference to a player: an index into the session's player registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerHandle(pub u32);

impl PlayerHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Monotonic id source shared by every entity in a session
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Whether `id` was ever handed out by this allocator
    pub fn was_issued(&self, id: EntityId) -> bool {
        id < self.next
    }
}

/// Planet a piece of debris came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebrisSource {
    Bottom,
    Top,
}

/// Ordinary debris or the rarer special kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebrisKind {
    #[default]
    Ordinary,
    Special,
}

/// Visual spin of a piece of debris
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    None,
    Clockwise,
    CounterClockwise,
}

impl Spin {
    fn sign(self) -> f32 {
        match self {
            Spin::None => 0.0,
            Spin::Clockwise => 1.0,
            Spin::CounterClockwise => -1.0,
        }
    }

    fn random(rng: &mut SimRng) -> Self {
        match rng.random_in_range(0, 2) {
            0 => Spin::None,
            1 => Spin::Clockwise,
            _ => Spin::CounterClockwise,
        }
    }
}

/// Snapshot of a captured piece of debris, as stored in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectedDebris {
    pub source: DebrisSource,
    pub mass: f32,
}

/// A drifting collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub id: EntityId,
    pub position: Vec2,
    /// Lateral velocity in units per tick; negative drifts toward the leading edge
    pub velocity_x: f32,
    mass: f32,
    source: DebrisSource,
    pub kind: DebrisKind,
    pub spin: Spin,
    /// Current visual angle (radians)
    pub angle: f32,
    /// Ticks since spawn
    pub age: u64,
    alive: bool,
}

impl Debris {
    /// Create debris with random mass, source and spin
    pub fn spawn(
        id: EntityId,
        position: Vec2,
        kind: DebrisKind,
        config: &DebrisConfig,
        rng: &mut SimRng,
    ) -> Self {
        let (mass, spin) = match kind {
            DebrisKind::Ordinary => (
                Self::determine_scale_factor(rng, config.min_mass),
                Spin::random(rng),
            ),
            DebrisKind::Special => {
                let spin = if rng.coin() {
                    Spin::Clockwise
                } else {
                    Spin::CounterClockwise
                };
                (config.special_mass, spin)
            }
        };
        let source = if rng.coin() {
            DebrisSource::Top
        } else {
            DebrisSource::Bottom
        };
        Self::new(id, position, mass, source, kind, spin, config)
    }

    /// Create debris with explicit attributes
    pub fn new(
        id: EntityId,
        position: Vec2,
        mass: f32,
        source: DebrisSource,
        kind: DebrisKind,
        spin: Spin,
        config: &DebrisConfig,
    ) -> Self {
        let mass = mass.clamp(config.min_mass, 1.0);
        let drift = (1.0 - mass).max(config.min_drift_factor);
        Self {
            id,
            position,
            velocity_x: -drift * config.drift_per_tick * config.game_speed,
            mass,
            source,
            kind,
            spin,
            angle: 0.0,
            age: 0,
            alive: true,
        }
    }

    /// Skewed mass draw: `random() / randomInRange(2, 5)`, floored at `min_mass`.
    ///
    /// Dividing by a small integer piles most draws under 0.25, so small debris
    /// dominates while the floor keeps every piece worth something.
    pub fn determine_scale_factor(rng: &mut SimRng, min_mass: f32) -> f32 {
        let divisor = rng.random_in_range(2, 5) as f32;
        (rng.random() / divisor).max(min_mass)
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn source(&self) -> DebrisSource {
        self.source
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Immutable capture snapshot; does not retire the debris
    pub fn collection_data(&self) -> CollectedDebris {
        CollectedDebris {
            source: self.source,
            mass: self.mass,
        }
    }

    /// Collision radius, proportional to mass
    pub fn radius(&self, radius_at_unit_mass: f32) -> f32 {
        self.mass * radius_at_unit_mass
    }

    /// Mark retired. Returns false if it was already retired.
    pub fn retire(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    /// Push beam: invert lateral drift so the debris heads away from `origin_x`.
    /// Already-receding debris keeps its course.
    pub fn repel_from(&mut self, origin_x: f32) {
        let away = if self.position.x >= origin_x { 1.0 } else { -1.0 };
        self.velocity_x = away * self.velocity_x.abs();
    }

    /// Advance one tick of drift and spin
    pub fn advance(&mut self, spin_per_tick: f32) {
        if !self.alive {
            return;
        }
        self.position.x += self.velocity_x;
        self.angle += self.spin.sign() * spin_per_tick;
        self.age += 1;
    }
}

/// Gravity cannon mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeamAction {
    /// Repel debris
    Push,
    /// Capture debris
    #[default]
    Pull,
}

/// A single beam pulse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: PlayerHandle,
    pub action: BeamAction,
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    pub target: Vec2,
    /// Ticks alive
    pub age: u32,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        owner: PlayerHandle,
        action: BeamAction,
        position: Vec2,
        target: Vec2,
        speed: f32,
        fallback_direction: Vec2,
    ) -> Self {
        let direction = match (target - position).normalize() {
            d if d == Vec2::ZERO => fallback_direction.normalize(),
            d => d,
        };
        Self {
            id,
            owner,
            action,
            position,
            velocity: direction * speed,
            target,
            age: 0,
        }
    }
}

/// Incremental rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Left,
    Right,
}

/// The player craft
#[derive(Debug, Clone)]
pub struct Player {
    pub handle: PlayerHandle,
    pub position: Vec2,
    /// Vertical drive velocity (units/second), set from the ledger every tick
    pub velocity_y: f32,
    /// Rotation in radians; the nose points at `rotation + FACING_OFFSET`
    pub rotation: f32,
    pub crashed: bool,
    pub firing: bool,
    pub action: BeamAction,
    /// Active incremental rotation, if any
    pub rotation_intent: Option<RotationDirection>,
    /// Pending absolute rotation target
    pub rotate_target: Option<f32>,
    /// Last pointer position reported by the input source
    pub aim_target: Option<Vec2>,
    pub warp_cores: u8,
    pub ledger: CollectionLedger,
    /// Live beam pulses owned by this craft
    pub projectiles: Vec<Projectile>,
}

impl Player {
    pub fn new(handle: PlayerHandle, config: &PlayerConfig) -> Self {
        Self {
            handle,
            position: Vec2::new(config.start_x, config.start_y),
            velocity_y: 0.0,
            rotation: config.start_rotation,
            crashed: false,
            firing: false,
            action: BeamAction::default(),
            rotation_intent: None,
            rotate_target: None,
            aim_target: None,
            warp_cores: config.starting_warp_cores,
            ledger: CollectionLedger::new(),
            projectiles: Vec::new(),
        }
    }

    /// Angle the nose points at
    pub fn facing_angle(&self) -> f32 {
        self.rotation + FACING_OFFSET
    }

    /// Unit vector along the nose
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.facing_angle())
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_intent.is_some() || self.rotate_target.is_some()
    }

    /// Neither rotating nor firing nor crashed
    pub fn is_idle(&self) -> bool {
        !self.crashed && !self.firing && !self.is_rotating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debris_config() -> DebrisConfig {
        DebrisConfig::default()
    }

    #[test]
    fn test_id_allocator_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert!(ids.was_issued(2));
        assert!(!ids.was_issued(3));
    }

    #[test]
    fn test_scale_factor_respects_floor() {
        let mut rng = SimRng::seeded(11);
        for _ in 0..5000 {
            let mass = Debris::determine_scale_factor(&mut rng, 0.05);
            assert!(mass >= 0.05);
            assert!(mass < 0.5, "random() / 2 can never reach 0.5, got {}", mass);
        }
    }

    #[test]
    fn test_scale_factor_skews_small() {
        let mut rng = SimRng::seeded(12);
        let draws: Vec<f32> = (0..4000)
            .map(|_| Debris::determine_scale_factor(&mut rng, 0.01))
            .collect();
        let small = draws.iter().filter(|m| **m < 0.25).count();
        assert!(small * 10 > draws.len() * 7, "Most debris should be small");
    }

    #[test]
    fn test_new_clamps_mass() {
        let config = debris_config();
        let tiny = Debris::new(0, Vec2::ZERO, 0.0001, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);
        assert!((tiny.mass() - config.min_mass).abs() < 1e-6);

        let huge = Debris::new(1, Vec2::ZERO, 3.0, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);
        assert!((huge.mass() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_drift_proportional_to_lightness() {
        let config = debris_config();
        let light = Debris::new(0, Vec2::ZERO, 0.1, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);
        let medium = Debris::new(1, Vec2::ZERO, 0.6, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);

        assert!((light.velocity_x + 0.9).abs() < 1e-6);
        assert!((medium.velocity_x + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_heavy_debris_drifts_at_floor() {
        let config = debris_config();
        let heavy = Debris::new(0, Vec2::ZERO, 0.9, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);
        let full = Debris::new(1, Vec2::ZERO, 1.0, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);

        let floor = -config.min_drift_factor * config.drift_per_tick * config.game_speed;
        assert!((heavy.velocity_x - floor).abs() < 1e-6);
        assert!((full.velocity_x - floor).abs() < 1e-6);
        assert!(full.velocity_x < 0.0);
    }

    #[test]
    fn test_advance_moves_and_spins() {
        let config = debris_config();
        let mut debris = Debris::new(0, Vec2::new(100.0, 50.0), 0.5, DebrisSource::Bottom, DebrisKind::Ordinary, Spin::CounterClockwise, &config);
        debris.advance(0.1);

        assert!((debris.position.x - 99.5).abs() < 1e-5);
        assert!((debris.position.y - 50.0).abs() < 1e-5);
        assert!((debris.angle + 0.1).abs() < 1e-6);
        assert_eq!(debris.age, 1);
    }

    #[test]
    fn test_retired_debris_does_not_advance() {
        let config = debris_config();
        let mut debris = Debris::new(0, Vec2::new(100.0, 50.0), 0.5, DebrisSource::Bottom, DebrisKind::Ordinary, Spin::None, &config);
        debris.retire();
        debris.advance(0.1);
        assert_eq!(debris.position, Vec2::new(100.0, 50.0));
        assert_eq!(debris.age, 0);
    }

    #[test]
    fn test_retire_is_idempotent() {
        let config = debris_config();
        let mut debris = Debris::new(0, Vec2::ZERO, 0.5, DebrisSource::Bottom, DebrisKind::Ordinary, Spin::None, &config);
        assert!(debris.retire());
        assert!(!debris.retire());
        assert!(!debris.is_alive());
    }

    #[test]
    fn test_collection_data_is_pure() {
        let config = debris_config();
        let debris = Debris::new(0, Vec2::ZERO, 0.5, DebrisSource::Bottom, DebrisKind::Ordinary, Spin::None, &config);
        let data = debris.collection_data();

        assert_eq!(data, CollectedDebris { source: DebrisSource::Bottom, mass: 0.5 });
        assert!(debris.is_alive());
    }

    #[test]
    fn test_repel_inverts_drift() {
        let config = debris_config();
        let mut debris = Debris::new(0, Vec2::new(600.0, 0.0), 0.5, DebrisSource::Top, DebrisKind::Ordinary, Spin::None, &config);
        let before = debris.velocity_x;
        debris.repel_from(200.0);
        assert!((debris.velocity_x + before).abs() < 1e-6);
        assert!(debris.velocity_x > 0.0);

        // A second push does not flip it back
        debris.repel_from(200.0);
        assert!((debris.velocity_x + before).abs() < 1e-6);
    }

    #[test]
    fn test_special_debris_spins_and_drifts() {
        let config = debris_config();
        let mut rng = SimRng::seeded(5);
        for id in 0..50 {
            let debris = Debris::spawn(id, Vec2::ZERO, DebrisKind::Special, &config, &mut rng);
            assert!((debris.mass() - config.special_mass).abs() < 1e-6);
            assert_ne!(debris.spin, Spin::None);
            assert!(debris.velocity_x < 0.0, "special debris must head for the barrier");
        }
    }

    #[test]
    fn test_spawn_draws_both_sources() {
        let config = debris_config();
        let mut rng = SimRng::seeded(6);
        let sources: Vec<DebrisSource> = (0..100)
            .map(|id| Debris::spawn(id, Vec2::ZERO, DebrisKind::Ordinary, &config, &mut rng).source())
            .collect();
        assert!(sources.contains(&DebrisSource::Top));
        assert!(sources.contains(&DebrisSource::Bottom));
    }

    #[test]
    fn test_projectile_aims_at_target() {
        let p = Projectile::new(0, PlayerHandle(0), BeamAction::Pull, Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), 1000.0, Vec2::RIGHT);
        assert!(p.velocity.approx_eq(Vec2::new(0.0, 1000.0), 1e-3));
        assert_eq!(p.age, 0);
    }

    #[test]
    fn test_projectile_degenerate_target_uses_fallback() {
        let origin = Vec2::new(5.0, 5.0);
        let p = Projectile::new(0, PlayerHandle(0), BeamAction::Push, origin, origin, 1000.0, Vec2::RIGHT);
        assert!(p.velocity.approx_eq(Vec2::new(1000.0, 0.0), 1e-3));
    }

    #[test]
    fn test_player_new_faces_right() {
        let player = Player::new(PlayerHandle(0), &PlayerConfig::default());
        assert!(player.facing().approx_eq(Vec2::RIGHT, 1e-5));
        assert_eq!(player.warp_cores, 3);
        assert!(player.is_idle());
        assert_eq!(player.action, BeamAction::Pull);
    }
}
