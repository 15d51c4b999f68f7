//! Scripted input source for the headless runner
//!
//! Pulls debris that would level the craft, pushes debris that would tip it
//! further once it gets close, and burns a warp core when the drive gets steep.

use tracing::debug;

use planet_drift::game::constants::player::FACING_OFFSET;
use planet_drift::game::control::{ControlEvent, ControlSender};
use planet_drift::game::session::Simulation;
use planet_drift::game::state::{BeamAction, Debris, DebrisSource, EntityId, Player, PlayerHandle};

/// Balance beyond which a warp core is spent
const WARP_THRESHOLD: f32 = 0.6;
/// Balance treated as level
const LEVEL_BAND: f32 = 0.05;
/// Unwanted debris closer than this gets pushed
const PUSH_RANGE: f32 = 180.0;

pub struct Autopilot {
    handle: PlayerHandle,
    sender: ControlSender,
    beam: Option<BeamAction>,
    target: Option<EntityId>,
}

impl Autopilot {
    pub fn new(handle: PlayerHandle, sender: ControlSender) -> Self {
        Self {
            handle,
            sender,
            beam: None,
            target: None,
        }
    }

    /// Queue this tick's controls based on the current session state
    pub fn steer(&mut self, sim: &Simulation) {
        let Some(craft) = sim.player(self.handle) else {
            return;
        };
        if craft.crashed {
            return;
        }

        let balance = craft.ledger.relative_mass();
        if balance.abs() > WARP_THRESHOLD && craft.warp_cores > 0 {
            self.send(ControlEvent::UseWarpCore);
        }

        let range = sim.config().cannon.max_beam_length;
        let choice = sim
            .debris()
            .live()
            .filter(|d| d.position.x > craft.position.x && d.position.distance_to(craft.position) <= range)
            .filter_map(|d| pick_action(craft, d, balance).map(|action| (d, action)))
            .min_by(|(a, _), (b, _)| {
                a.position
                    .distance_sq_to(craft.position)
                    .total_cmp(&b.position.distance_sq_to(craft.position))
            });

        match choice {
            Some((debris, action)) => {
                if self.target != Some(debris.id) {
                    self.target = Some(debris.id);
                    self.send(ControlEvent::AimAt(debris.position));
                    // Turn the nose toward the target as well
                    let heading = craft.position.angle_towards(debris.position);
                    self.send(ControlEvent::RotateTo(heading - FACING_OFFSET));
                }
                if self.beam != Some(action) {
                    self.beam = Some(action);
                    self.send(ControlEvent::BeamStart(action));
                }
            }
            None if self.beam.is_some() => {
                self.beam = None;
                self.target = None;
                self.send(ControlEvent::BeamStop);
            }
            None => {}
        }
    }

    fn send(&self, event: ControlEvent) {
        if let Err(e) = self.sender.try_send(self.handle, event) {
            debug!("Autopilot dropped {:?}: {}", event, e);
        }
    }
}

/// Pull what levels the craft, push what tips it and is already close
fn pick_action(craft: &Player, debris: &Debris, balance: f32) -> Option<BeamAction> {
    let wanted = if balance > LEVEL_BAND {
        Some(DebrisSource::Bottom)
    } else if balance < -LEVEL_BAND {
        Some(DebrisSource::Top)
    } else {
        None
    };

    match wanted {
        None => Some(BeamAction::Pull),
        Some(source) if debris.source() == source => Some(BeamAction::Pull),
        Some(_) if debris.position.distance_to(craft.position) < PUSH_RANGE => Some(BeamAction::Push),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planet_drift::config::SimConfig;
    use planet_drift::game::session::PRIMARY_PLAYER;
    use planet_drift::game::state::{DebrisKind, Spin};

    #[test]
    fn test_autopilot_flies_a_session() {
        let mut sim = Simulation::new(SimConfig::seeded(17)).unwrap();
        let mut pilot = Autopilot::new(PRIMARY_PLAYER, sim.control_sender());

        for _ in 0..1200 {
            sim.tick();
            pilot.steer(&sim);
            if sim.is_crashed() {
                break;
            }
        }
        assert!(sim.distance() > 0);
        assert!(sim.summary().ticks > 0);
    }

    #[test]
    fn test_level_craft_pulls_anything() {
        let config = SimConfig::seeded(1);
        let craft = Player::new(PRIMARY_PLAYER, &config.player);
        let debris = Debris::new(
            0,
            craft.position,
            0.2,
            DebrisSource::Top,
            DebrisKind::Ordinary,
            Spin::None,
            &config.debris,
        );
        assert_eq!(pick_action(&craft, &debris, 0.0), Some(BeamAction::Pull));
        assert_eq!(pick_action(&craft, &debris, 0.3), Some(BeamAction::Push));
        assert_eq!(pick_action(&craft, &debris, -0.3), Some(BeamAction::Pull));
    }
}
