//! Built-in overlap detector
//!
//! Circle-vs-circle tests for craft/debris and pulse/debris, plus a band test
//! for the planets. Produces the same [`CollisionEvent`]s an external notifier
//! would report; the session dispatches both streams the same way.

use crate::config::SimConfig;
use crate::game::events::CollisionEvent;
use crate::game::state::{Debris, Player};
use crate::game::systems::debris::DebrisManager;
use crate::util::vec2::Vec2;

#[inline]
fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_sq_to(b) < reach * reach
}

/// Whether the craft touches either planet band
pub fn touches_planet(player: &Player, config: &SimConfig) -> bool {
    let radius = config.player.radius;
    let top_surface = config.field.planet_thickness;
    let bottom_surface = config.field.height - config.field.planet_thickness;
    player.position.y - radius <= top_surface || player.position.y + radius >= bottom_surface
}

/// Keep the craft clear of both planets (used when failure is disabled)
pub fn clamp_to_corridor(player: &mut Player, config: &SimConfig) {
    let radius = config.player.radius;
    let min_y = config.field.planet_thickness + radius;
    let max_y = config.field.height - config.field.planet_thickness - radius;
    if player.position.y < min_y || player.position.y > max_y {
        player.position.y = player.position.y.clamp(min_y, max_y);
        player.velocity_y = 0.0;
    }
}

/// Detect every overlap this tick, in player order
pub fn detect(players: &[Player], debris: &DebrisManager, config: &SimConfig) -> Vec<CollisionEvent> {
    let mut collisions = Vec::new();
    let debris_radius = |d: &Debris| d.radius(config.debris.radius_at_unit_mass);

    for player in players {
        if !player.crashed {
            if touches_planet(player, config) && !config.disable_failure {
                collisions.push(CollisionEvent::PlayerPlanet { player: player.handle });
            }

            collisions.extend(
                debris
                    .live()
                    .filter(|&d| circles_overlap(player.position, config.player.radius, d.position, debris_radius(d)))
                    .map(|d| CollisionEvent::PlayerDebris {
                        player: player.handle,
                        debris: d.id,
                    }),
            );
        }

        // A pulse affects at most one piece of debris
        for projectile in &player.projectiles {
            let hit = debris.live().find(|&d| {
                circles_overlap(projectile.position, config.cannon.projectile_radius, d.position, debris_radius(d))
            });
            if let Some(d) = hit {
                collisions.push(CollisionEvent::ProjectileDebris {
                    projectile: projectile.id,
                    debris: d.id,
                });
            }
        }
    }

    collisions
}
