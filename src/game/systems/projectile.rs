//! Gravity cannon
//!
//! While a player is firing, one beam pulse is emitted per tick toward the
//! pointer (or straight ahead when no pointer was reported). Pulses age one
//! tick at a time and expire on age or distance from their owner, whether or
//! not they hit anything.

use tracing::trace;

use crate::config::CannonConfig;
use crate::game::events::{ProjectileDestroyCause, SimEvent};
use crate::game::state::{EntityId, IdAllocator, Player, Projectile};

/// Emit one pulse from the player's position
pub fn fire(
    player: &mut Player,
    config: &CannonConfig,
    ids: &mut IdAllocator,
    events: &mut Vec<SimEvent>,
) -> EntityId {
    let facing = player.facing();
    let target = player
        .aim_target
        .unwrap_or(player.position + facing * config.max_beam_length);

    let projectile = Projectile::new(
        ids.next_id(),
        player.handle,
        player.action,
        player.position,
        target,
        config.beam_speed,
        facing,
    );
    let id = projectile.id;

    events.push(SimEvent::ProjectileSpawned {
        id,
        owner: player.handle,
        action: projectile.action,
        position: projectile.position,
        target,
    });
    player.projectiles.push(projectile);
    id
}

/// Age and move every pulse of `player`, expiring the ones past their range
pub fn update(player: &mut Player, config: &CannonConfig, dt: f32, events: &mut Vec<SimEvent>) {
    let owner_position = player.position;
    let max_range_sq = config.max_beam_length * config.max_beam_length;

    player.projectiles.retain_mut(|projectile| {
        projectile.age += 1;
        projectile.position += projectile.velocity * dt;

        let expired = projectile.age > config.max_age_ticks
            || projectile.position.distance_sq_to(owner_position) > max_range_sq;
        if expired {
            trace!("Projectile {} expired at age {}", projectile.id, projectile.age);
            events.push(SimEvent::ProjectileDestroyed {
                id: projectile.id,
                cause: ProjectileDestroyCause::Expired,
            });
        }
        !expired
    });
}

/// Remove a pulse by id, returning it if it was still live
pub fn take(player: &mut Player, id: EntityId) -> Option<Projectile> {
    let index = player.projectiles.iter().position(|p| p.id == id)?;
    Some(player.projectiles.remove(index))
}

/// Destroy every live pulse of `player`
pub fn clear_all(player: &mut Player, cause: ProjectileDestroyCause, events: &mut Vec<SimEvent>) {
    events.extend(
        player
            .projectiles
            .drain(..)
            .map(|p| SimEvent::ProjectileDestroyed { id: p.id, cause }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::game::state::{BeamAction, PlayerHandle};
    use crate::util::vec2::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (Player, CannonConfig, IdAllocator, Vec<SimEvent>) {
        (
            Player::new(PlayerHandle(0), &PlayerConfig::default()),
            CannonConfig::default(),
            IdAllocator::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_fire_straight_ahead_without_pointer() {
        let (mut player, config, mut ids, mut events) = setup();
        fire(&mut player, &config, &mut ids, &mut events);

        assert_eq!(player.projectiles.len(), 1);
        let projectile = &player.projectiles[0];
        assert_eq!(projectile.owner, PlayerHandle(0));
        assert_eq!(projectile.action, BeamAction::Pull);
        assert!(projectile.velocity.approx_eq(Vec2::new(config.beam_speed, 0.0), 1e-2));
        assert!(matches!(events[0], SimEvent::ProjectileSpawned { .. }));
    }

    #[test]
    fn test_fire_toward_pointer() {
        let (mut player, config, mut ids, mut events) = setup();
        player.aim_target = Some(player.position + Vec2::new(0.0, -50.0));
        player.action = BeamAction::Push;
        fire(&mut player, &config, &mut ids, &mut events);

        let projectile = &player.projectiles[0];
        assert_eq!(projectile.action, BeamAction::Push);
        assert!(projectile.velocity.approx_eq(Vec2::new(0.0, -config.beam_speed), 1e-2));
    }

    #[test]
    fn test_age_increments_once_per_tick() {
        let (mut player, config, mut ids, mut events) = setup();
        fire(&mut player, &config, &mut ids, &mut events);

        for expected in 1..=5 {
            update(&mut player, &config, DT, &mut events);
            assert_eq!(player.projectiles[0].age, expected);
        }
    }

    #[test]
    fn test_expires_on_first_tick_past_max_age() {
        let (mut player, mut config, mut ids, mut events) = setup();
        // Range large enough that only age matters
        config.max_beam_length = 1.0e6;
        fire(&mut player, &config, &mut ids, &mut events);

        for _ in 0..config.max_age_ticks {
            update(&mut player, &config, DT, &mut events);
        }
        assert_eq!(player.projectiles.len(), 1, "Still alive at exactly max age");

        update(&mut player, &config, DT, &mut events);
        assert!(player.projectiles.is_empty());
        assert!(matches!(
            events.last(),
            Some(SimEvent::ProjectileDestroyed { cause: ProjectileDestroyCause::Expired, .. })
        ));
    }

    #[test]
    fn test_expires_past_beam_length() {
        let (mut player, mut config, mut ids, mut events) = setup();
        config.max_age_ticks = 1000;
        config.max_beam_length = 40.0;
        fire(&mut player, &config, &mut ids, &mut events);

        // 1000 u/s at 60 Hz covers ~16.7 units per tick: gone after the 3rd tick
        for _ in 0..2 {
            update(&mut player, &config, DT, &mut events);
        }
        assert_eq!(player.projectiles.len(), 1);
        update(&mut player, &config, DT, &mut events);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn test_take_removes_once() {
        let (mut player, config, mut ids, mut events) = setup();
        let id = fire(&mut player, &config, &mut ids, &mut events);

        assert!(take(&mut player, id).is_some());
        assert!(take(&mut player, id).is_none());
    }

    #[test]
    fn test_clear_all() {
        let (mut player, config, mut ids, mut events) = setup();
        for _ in 0..3 {
            fire(&mut player, &config, &mut ids, &mut events);
        }
        events.clear();

        clear_all(&mut player, ProjectileDestroyCause::BeamStopped, &mut events);
        assert!(player.projectiles.is_empty());
        assert_eq!(events.len(), 3);
    }
}
