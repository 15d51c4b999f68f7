//! Default tunables for the simulation
//!
//! These are the compile-time defaults behind [`crate::config::SimConfig`].
//! Every value here can be overridden per session through the config struct,
//! and most through `PLANET_DRIFT_*` environment variables.

/// Simulation clock
pub mod clock {
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Delta time per tick in seconds
    pub const DT: f32 = 1.0 / TICK_RATE as f32;

    /// Convert a millisecond interval into whole ticks (at least one)
    pub const fn ms_to_ticks(ms: u64, tick_rate: u32) -> u64 {
        let ticks = ms * tick_rate as u64 / 1000;
        if ticks == 0 {
            1
        } else {
            ticks
        }
    }
}

/// Play field geometry
pub mod field {
    /// Field width in units
    pub const WIDTH: f32 = 1200.0;
    /// Field height in units
    pub const HEIGHT: f32 = 600.0;
    /// Thickness of the planet band along the top and bottom edges
    pub const PLANET_THICKNESS: f32 = 40.0;
    /// Debris spawns this far beyond the trailing (right) edge
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Debris retires once it drifts past this x (the leading barrier)
    pub const BARRIER_X: f32 = -100.0;
    /// Vertical spawn band for debris (inclusive)
    pub const SPAWN_Y_MIN: i32 = 80;
    pub const SPAWN_Y_MAX: i32 = 500;
}

/// Debris population and entity tunables
pub mod debris {
    /// Time between ordinary spawn waves
    pub const SPAWN_INTERVAL_MS: u64 = 3000;
    /// Time between special spawn waves
    pub const SPECIAL_SPAWN_INTERVAL_MS: u64 = 6000;
    /// Debris spawned when the manager starts
    pub const COUNT_ON_START: usize = 10;
    /// Ordinary debris per wave
    pub const COUNT_PER_INTERVAL: usize = 10;
    /// Special debris per wave
    pub const SPECIALS_PER_INTERVAL: usize = 1;
    /// Floor applied to the skewed mass draw
    pub const MIN_MASS: f32 = 0.05;
    /// Mass carried by every special debris
    pub const SPECIAL_MASS: f32 = 1.0;
    /// Lateral drift per tick is `max(1 - mass, MIN_DRIFT_FACTOR) * DRIFT_PER_TICK * game_speed`
    pub const DRIFT_PER_TICK: f32 = 1.0;
    /// Floor on the `1 - mass` drift factor so full-mass debris still crosses the field
    pub const MIN_DRIFT_FACTOR: f32 = 0.25;
    /// Global scroll multiplier
    pub const GAME_SPEED: f32 = 1.0;
    /// Spin per tick for rotating debris (radians)
    pub const SPIN_PER_TICK: f32 = 0.02;
    /// Collision radius of a debris of mass 1.0; scales linearly with mass
    pub const RADIUS_AT_UNIT_MASS: f32 = 48.0;
}

/// Gravity cannon tunables
pub mod cannon {
    /// Beam projectile speed (units/second)
    pub const BEAM_SPEED: f32 = 1000.0;
    /// Projectile lifespan in ticks
    pub const MAX_AGE_TICKS: u32 = 20;
    /// Maximum distance a projectile may travel from its owner
    pub const MAX_BEAM_LENGTH: f32 = 400.0;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 8.0;
}

/// Player craft tunables
pub mod player {
    use std::f32::consts::PI;

    /// Starting position
    pub const START_X: f32 = 200.0;
    pub const START_Y: f32 = super::field::HEIGHT / 2.0 - 10.0;
    /// Starting rotation (radians); with FACING_OFFSET the craft faces +x
    pub const START_ROTATION: f32 = 3.0 * PI / 2.0;
    /// The craft's nose points at `rotation + FACING_OFFSET`
    pub const FACING_OFFSET: f32 = PI / 2.0;
    /// Incremental rotation step per tick (radians)
    pub const ROTATION_STEP: f32 = 0.05;
    /// Maximum angular velocity for absolute rotate-to (radians/second)
    pub const MAX_ANGULAR_VELOCITY: f32 = PI;
    /// Vertical drive = relative mass * GRAVITY_FACTOR (units/second)
    pub const GRAVITY_FACTOR: f32 = 100.0;
    /// Warp cores at session start
    pub const STARTING_WARP_CORES: u8 = 3;
    /// Craft collision radius
    pub const RADIUS: f32 = 16.0;
}

/// End-of-session scoring
pub mod scoring {
    /// Collected mass is scaled by this before flooring into points
    pub const MASS_SCALE: f32 = 1000.0;
    /// Tolerance added before flooring so f32 sums like 0.7 still score 700
    pub const FLOOR_TOLERANCE: f32 = 1e-3;
}

/// Session plumbing
pub mod session {
    /// Capacity of the bounded control queue
    pub const CONTROL_QUEUE_CAPACITY: usize = 256;
}
