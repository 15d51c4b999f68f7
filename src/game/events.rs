//! Events crossing the core boundary
//!
//! [`CollisionEvent`]s come in from a collision notifier (external or the
//! built-in detector). [`SimEvent`]s go out to the presentation layer, returned
//! from every tick in emission order.

use serde::{Deserialize, Serialize};

use crate::game::ledger::LedgerSnapshot;
use crate::game::scoring::FinalScore;
use crate::game::state::{BeamAction, DebrisKind, DebrisSource, EntityId, PlayerHandle};
use crate::util::vec2::Vec2;

/// Overlap notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Craft touched debris: collect it
    PlayerDebris { player: PlayerHandle, debris: EntityId },
    /// Beam pulse touched debris: push or pull it
    ProjectileDebris { projectile: EntityId, debris: EntityId },
    /// Debris left the play boundary
    DebrisBoundaryExit { debris: EntityId },
    /// Craft touched a planet
    PlayerPlanet { player: PlayerHandle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebrisDestroyCause {
    /// Touched by the craft
    Collected,
    /// Struck by a pull beam
    PulledIn,
    LeftField,
    Decayed,
    /// Cleared by a session restart
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileDestroyCause {
    /// Exceeded max age or beam length
    Expired,
    /// Applied its effect to debris
    Hit,
    /// Owner released the beam
    BeamStopped,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    CollectBottom,
    CollectTop,
    Crash,
}

impl SoundCue {
    pub fn for_collection(source: DebrisSource) -> Self {
        match source {
            DebrisSource::Bottom => SoundCue::CollectBottom,
            DebrisSource::Top => SoundCue::CollectTop,
        }
    }
}

/// Abstract command for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    DebrisSpawned {
        id: EntityId,
        kind: DebrisKind,
        source: DebrisSource,
        mass: f32,
        position: Vec2,
    },
    DebrisDestroyed {
        id: EntityId,
        cause: DebrisDestroyCause,
    },
    ProjectileSpawned {
        id: EntityId,
        owner: PlayerHandle,
        action: BeamAction,
        position: Vec2,
        target: Vec2,
    },
    ProjectileDestroyed {
        id: EntityId,
        cause: ProjectileDestroyCause,
    },
    ScoreUpdate {
        distance: u64,
    },
    WarpCoreCountChanged {
        player: PlayerHandle,
        count: u8,
    },
    PlaySound(SoundCue),
    Crash {
        player: PlayerHandle,
        final_distance: u64,
        ledger: LedgerSnapshot,
        score: FinalScore,
    },
    /// Something was addressed that does not exist; logged, never fatal
    Anomaly {
        detail: String,
    },
}
