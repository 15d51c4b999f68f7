//! Player control state machine
//!
//! Rotation and firing are independent flags; `crashed` is terminal and turns
//! every control event into a no-op.

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::game::control::ControlEvent;
use crate::game::events::{ProjectileDestroyCause, SimEvent, SoundCue};
use crate::game::scoring;
use crate::game::state::{CollectedDebris, IdAllocator, Player, RotationDirection};
use crate::game::systems::projectile;
use crate::util::angle;

/// Apply one control event
pub fn apply_control(
    player: &mut Player,
    event: ControlEvent,
    config: &SimConfig,
    events: &mut Vec<SimEvent>,
) {
    if player.crashed {
        debug!("Ignoring {:?} for crashed player {:?}", event, player.handle);
        return;
    }

    match event {
        ControlEvent::RotateStart(direction) => {
            player.rotation_intent = Some(direction);
            player.rotate_target = None;
        }
        ControlEvent::RotateStop => player.rotation_intent = None,
        ControlEvent::RotateTo(angle) => {
            player.rotate_target = Some(angle);
            player.rotation_intent = None;
        }
        ControlEvent::BeamStart(action) => {
            player.firing = true;
            player.action = action;
        }
        ControlEvent::BeamStop => {
            player.firing = false;
            projectile::clear_all(player, ProjectileDestroyCause::BeamStopped, events);
        }
        ControlEvent::UseWarpCore => {
            use_warp_core(player, config.warp_core_zeroes_when_empty, events);
        }
        ControlEvent::AimAt(point) => player.aim_target = Some(point),
    }
}

/// Spend a warp core to zero the drive. Returns whether the ledger was adjusted.
///
/// With no cores left the request is rejected unless `zeroes_when_empty` is set,
/// in which case the balance is still zeroed and the count stays at 0.
pub fn use_warp_core(player: &mut Player, zeroes_when_empty: bool, events: &mut Vec<SimEvent>) -> bool {
    if player.crashed {
        return false;
    }

    if player.warp_cores == 0 {
        if !zeroes_when_empty {
            debug!("Player {:?} has no warp cores left", player.handle);
            return false;
        }
        player.ledger.add_warp_core_adjustment();
        return true;
    }

    player.warp_cores -= 1;
    player.ledger.add_warp_core_adjustment();
    info!(
        "Player {:?} used a warp core, {} remaining",
        player.handle, player.warp_cores
    );
    events.push(SimEvent::WarpCoreCountChanged {
        player: player.handle,
        count: player.warp_cores,
    });
    true
}

/// Record a captured piece of debris. Ignored once crashed.
pub fn collect_debris(player: &mut Player, data: CollectedDebris, events: &mut Vec<SimEvent>) -> bool {
    if player.crashed {
        return false;
    }
    player.ledger.add(data);
    events.push(SimEvent::PlaySound(SoundCue::for_collection(data.source)));
    true
}

/// Per-tick update: fire, rotate, then drive vertically from the ledger balance
pub fn update(player: &mut Player, config: &SimConfig, ids: &mut IdAllocator, events: &mut Vec<SimEvent>) {
    if player.crashed {
        return;
    }
    let dt = config.dt();

    if player.firing {
        projectile::fire(player, &config.cannon, ids, events);
    }

    rotate(player, config, dt);

    player.velocity_y = player.ledger.relative_mass() * config.player.gravity_factor;
    player.position.y += player.velocity_y * dt;
}

fn rotate(player: &mut Player, config: &SimConfig, dt: f32) {
    if let Some(target) = player.rotate_target {
        let max_step = config.player.max_angular_velocity * dt;
        if angle::shortest_delta(player.rotation, target).abs() <= max_step {
            player.rotation = target;
            player.rotate_target = None;
        } else {
            player.rotation = angle::rotate_towards(player.rotation, target, max_step);
        }
        return;
    }

    match player.rotation_intent {
        Some(RotationDirection::Left) => player.rotation -= config.player.rotation_step,
        Some(RotationDirection::Right) => player.rotation += config.player.rotation_step,
        None => {}
    }
}

/// Enter the terminal crashed state. Returns false if already crashed.
///
/// Live projectiles are left to expire on their own.
pub fn crash(player: &mut Player, final_distance: u64, events: &mut Vec<SimEvent>) -> bool {
    if player.crashed {
        return false;
    }
    player.crashed = true;
    player.firing = false;
    player.velocity_y = 0.0;
    player.rotation_intent = None;
    player.rotate_target = None;

    let score = scoring::score_ledger(final_distance, &player.ledger);
    info!(
        "Player {:?} crashed at distance {} (score {})",
        player.handle, final_distance, score.total
    );
    events.push(SimEvent::PlaySound(SoundCue::Crash));
    events.push(SimEvent::Crash {
        player: player.handle,
        final_distance,
        ledger: player.ledger.snapshot(),
        score,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{BeamAction, DebrisSource, PlayerHandle};
    use std::f32::consts::PI;

    fn setup() -> (Player, SimConfig, IdAllocator, Vec<SimEvent>) {
        let config = SimConfig::seeded(1);
        (
            Player::new(PlayerHandle(0), &config.player),
            config,
            IdAllocator::new(),
            Vec::new(),
        )
    }

    fn top(mass: f32) -> CollectedDebris {
        CollectedDebris { source: DebrisSource::Top, mass }
    }

    #[test]
    fn test_incremental_rotation() {
        let (mut player, config, mut ids, mut events) = setup();
        let start = player.rotation;
        apply_control(&mut player, ControlEvent::RotateStart(RotationDirection::Right), &config, &mut events);
        update(&mut player, &config, &mut ids, &mut events);
        update(&mut player, &config, &mut ids, &mut events);
        assert!((player.rotation - (start + 2.0 * config.player.rotation_step)).abs() < 1e-5);

        apply_control(&mut player, ControlEvent::RotateStop, &config, &mut events);
        update(&mut player, &config, &mut ids, &mut events);
        assert!((player.rotation - (start + 2.0 * config.player.rotation_step)).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_to_bounded_and_settles() {
        let (mut player, config, mut ids, mut events) = setup();
        let target = player.rotation + PI / 2.0;
        apply_control(&mut player, ControlEvent::RotateTo(target), &config, &mut events);

        let max_step = config.player.max_angular_velocity * config.dt();
        let before = player.rotation;
        update(&mut player, &config, &mut ids, &mut events);
        assert!((player.rotation - before - max_step).abs() < 1e-5);

        // A quarter turn at PI rad/s takes half a second
        for _ in 0..40 {
            update(&mut player, &config, &mut ids, &mut events);
        }
        assert_eq!(player.rotation, target);
        assert!(player.rotate_target.is_none());
    }

    #[test]
    fn test_rotate_to_overrides_incremental() {
        let (mut player, config, _, mut events) = setup();
        apply_control(&mut player, ControlEvent::RotateStart(RotationDirection::Left), &config, &mut events);
        apply_control(&mut player, ControlEvent::RotateTo(0.0), &config, &mut events);
        assert!(player.rotation_intent.is_none());
        assert_eq!(player.rotate_target, Some(0.0));

        apply_control(&mut player, ControlEvent::RotateStart(RotationDirection::Left), &config, &mut events);
        assert!(player.rotate_target.is_none());
    }

    #[test]
    fn test_firing_emits_one_projectile_per_tick() {
        let (mut player, config, mut ids, mut events) = setup();
        apply_control(&mut player, ControlEvent::BeamStart(BeamAction::Push), &config, &mut events);
        for _ in 0..3 {
            update(&mut player, &config, &mut ids, &mut events);
        }
        assert_eq!(player.projectiles.len(), 3);
        assert!(player.projectiles.iter().all(|p| p.action == BeamAction::Push));

        apply_control(&mut player, ControlEvent::BeamStop, &config, &mut events);
        assert!(!player.firing);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn test_drive_follows_relative_mass() {
        let (mut player, config, mut ids, mut events) = setup();
        collect_debris(&mut player, top(0.5), &mut events);
        let y = player.position.y;
        update(&mut player, &config, &mut ids, &mut events);

        assert!((player.velocity_y - 0.5 * config.player.gravity_factor).abs() < 1e-4);
        assert!(player.position.y > y, "Top-heavy ledger drives toward +y");
    }

    #[test]
    fn test_collect_plays_source_sound() {
        let (mut player, _, _, mut events) = setup();
        collect_debris(&mut player, top(0.2), &mut events);
        assert_eq!(events, vec![SimEvent::PlaySound(SoundCue::CollectTop)]);
    }

    #[test]
    fn test_warp_core_consumption() {
        let (mut player, config, _, mut events) = setup();
        collect_debris(&mut player, top(0.4), &mut events);

        apply_control(&mut player, ControlEvent::UseWarpCore, &config, &mut events);
        assert_eq!(player.warp_cores, 2);
        assert!(player.ledger.relative_mass().abs() < 1e-5);
        assert!(events.contains(&SimEvent::WarpCoreCountChanged { player: PlayerHandle(0), count: 2 }));
    }

    #[test]
    fn test_warp_core_rejected_when_empty() {
        let (mut player, _, _, mut events) = setup();
        player.warp_cores = 0;
        collect_debris(&mut player, top(0.4), &mut events);

        assert!(!use_warp_core(&mut player, false, &mut events));
        assert_eq!(player.warp_cores, 0);
        assert!((player.ledger.relative_mass() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_warp_core_zeroes_when_empty_if_configured() {
        let (mut player, _, _, mut events) = setup();
        player.warp_cores = 0;
        collect_debris(&mut player, top(0.4), &mut events);

        assert!(use_warp_core(&mut player, true, &mut events));
        assert_eq!(player.warp_cores, 0);
        assert!(player.ledger.relative_mass().abs() < 1e-5);
    }

    #[test]
    fn test_crashed_ignores_controls() {
        let (mut player, config, mut ids, mut events) = setup();
        assert!(crash(&mut player, 100, &mut events));
        let rotation = player.rotation;
        let y = player.position.y;

        apply_control(&mut player, ControlEvent::RotateStart(RotationDirection::Left), &config, &mut events);
        apply_control(&mut player, ControlEvent::BeamStart(BeamAction::Pull), &config, &mut events);
        apply_control(&mut player, ControlEvent::UseWarpCore, &config, &mut events);
        update(&mut player, &config, &mut ids, &mut events);

        assert_eq!(player.rotation, rotation);
        assert_eq!(player.position.y, y);
        assert!(!player.firing);
        assert_eq!(player.warp_cores, 3);
        assert!(player.projectiles.is_empty());
        assert!(!collect_debris(&mut player, top(0.3), &mut events));
    }

    #[test]
    fn test_crash_once() {
        let (mut player, _, _, mut events) = setup();
        collect_debris(&mut player, CollectedDebris { source: DebrisSource::Bottom, mass: 0.25 }, &mut events);
        events.clear();

        assert!(crash(&mut player, 500, &mut events));
        assert!(!crash(&mut player, 600, &mut events));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SimEvent::PlaySound(SoundCue::Crash));
        match &events[1] {
            SimEvent::Crash { final_distance, score, .. } => {
                assert_eq!(*final_distance, 500);
                assert_eq!(score.total, 750);
            }
            other => panic!("Expected crash event, got {:?}", other),
        }
    }

    #[test]
    fn test_crash_keeps_live_projectiles() {
        let (mut player, config, mut ids, mut events) = setup();
        apply_control(&mut player, ControlEvent::BeamStart(BeamAction::Pull), &config, &mut events);
        update(&mut player, &config, &mut ids, &mut events);
        crash(&mut player, 1, &mut events);
        assert_eq!(player.projectiles.len(), 1);
        assert!(!player.firing);
    }
}
