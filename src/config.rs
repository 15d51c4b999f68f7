use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::constants::{cannon, clock, debris, field, player, session};

/// Play field geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Thickness of each planet band (top and bottom)
    pub planet_thickness: f32,
    /// Debris spawns at `width + spawn_margin`
    pub spawn_margin: f32,
    /// Debris drifting left of this x is retired
    pub barrier_x: f32,
    pub spawn_y_min: i32,
    pub spawn_y_max: i32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: field::WIDTH,
            height: field::HEIGHT,
            planet_thickness: field::PLANET_THICKNESS,
            spawn_margin: field::SPAWN_MARGIN,
            barrier_x: field::BARRIER_X,
            spawn_y_min: field::SPAWN_Y_MIN,
            spawn_y_max: field::SPAWN_Y_MAX,
        }
    }
}

impl FieldConfig {
    /// x where new debris appears
    pub fn spawn_x(&self) -> f32 {
        self.width + self.spawn_margin
    }

    /// Pushed debris retires once it is this far right
    pub fn trailing_limit_x(&self) -> f32 {
        self.width + self.spawn_margin * 2.0
    }
}

/// Debris spawning and entity behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisConfig {
    /// Ticks between ordinary spawn waves
    pub spawn_interval_ticks: u64,
    /// Ticks between special spawn waves
    pub special_spawn_interval_ticks: u64,
    pub count_on_start: usize,
    pub count_per_interval: usize,
    pub specials_per_interval: usize,
    /// Floor for the skewed mass draw
    pub min_mass: f32,
    /// Fixed mass of special debris
    pub special_mass: f32,
    pub drift_per_tick: f32,
    /// Lower bound on the `1 - mass` drift factor
    pub min_drift_factor: f32,
    pub game_speed: f32,
    pub spin_per_tick: f32,
    pub radius_at_unit_mass: f32,
    /// Debris older than this retires as decayed (None = never)
    pub lifetime_ticks: Option<u64>,
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ticks: clock::ms_to_ticks(debris::SPAWN_INTERVAL_MS, clock::TICK_RATE),
            special_spawn_interval_ticks: clock::ms_to_ticks(
                debris::SPECIAL_SPAWN_INTERVAL_MS,
                clock::TICK_RATE,
            ),
            count_on_start: debris::COUNT_ON_START,
            count_per_interval: debris::COUNT_PER_INTERVAL,
            specials_per_interval: debris::SPECIALS_PER_INTERVAL,
            min_mass: debris::MIN_MASS,
            special_mass: debris::SPECIAL_MASS,
            drift_per_tick: debris::DRIFT_PER_TICK,
            min_drift_factor: debris::MIN_DRIFT_FACTOR,
            game_speed: debris::GAME_SPEED,
            spin_per_tick: debris::SPIN_PER_TICK,
            radius_at_unit_mass: debris::RADIUS_AT_UNIT_MASS,
            lifetime_ticks: None,
        }
    }
}

/// Gravity cannon behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonConfig {
    pub beam_speed: f32,
    pub max_age_ticks: u32,
    pub max_beam_length: f32,
    pub projectile_radius: f32,
}

impl Default for CannonConfig {
    fn default() -> Self {
        Self {
            beam_speed: cannon::BEAM_SPEED,
            max_age_ticks: cannon::MAX_AGE_TICKS,
            max_beam_length: cannon::MAX_BEAM_LENGTH,
            projectile_radius: cannon::PROJECTILE_RADIUS,
        }
    }
}

/// Player craft behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub start_rotation: f32,
    pub rotation_step: f32,
    pub max_angular_velocity: f32,
    pub gravity_factor: f32,
    pub starting_warp_cores: u8,
    pub radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_x: player::START_X,
            start_y: player::START_Y,
            start_rotation: player::START_ROTATION,
            rotation_step: player::ROTATION_STEP,
            max_angular_velocity: player::MAX_ANGULAR_VELOCITY,
            gravity_factor: player::GRAVITY_FACTOR,
            starting_warp_cores: player::STARTING_WARP_CORES,
            radius: player::RADIUS,
        }
    }
}

/// Complete per-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed (None = OS entropy)
    pub seed: Option<u64>,
    pub tick_rate: u32,
    /// Planet contact clamps the craft instead of crashing it
    pub disable_failure: bool,
    /// Run the built-in overlap detector each tick
    pub detect_collisions: bool,
    /// Using a warp core with none left still zeroes the balance
    pub warp_core_zeroes_when_empty: bool,
    pub control_queue_capacity: usize,
    pub field: FieldConfig,
    pub debris: DebrisConfig,
    pub cannon: CannonConfig,
    pub player: PlayerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate: clock::TICK_RATE,
            disable_failure: false,
            detect_collisions: true,
            warp_core_zeroes_when_empty: false,
            control_queue_capacity: session::CONTROL_QUEUE_CAPACITY,
            field: FieldConfig::default(),
            debris: DebrisConfig::default(),
            cannon: CannonConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("tick_rate must be at least 1")]
    ZeroTickRate,
    #[error("play field must have positive size, got {width}x{height}")]
    EmptyField { width: f32, height: f32 },
    #[error("planet bands ({thickness} each) leave no room in a field {height} tall")]
    PlanetsOverlap { thickness: f32, height: f32 },
    #[error("debris spawn band {min}..={max} is empty")]
    EmptySpawnBand { min: i32, max: i32 },
    #[error("debris min_mass must be in (0, 1], got {0}")]
    MinMassOutOfRange(f32),
    #[error("special debris mass must be in (0, 1], got {0}")]
    SpecialMassOutOfRange(f32),
    #[error("debris min_drift_factor must be in (0, 1], got {0}")]
    MinDriftOutOfRange(f32),
    #[error("debris would never drift: drift_per_tick {drift} x game_speed {speed}")]
    NoDrift { drift: f32, speed: f32 },
    #[error("spawn intervals must be at least one tick")]
    ZeroSpawnInterval,
    #[error("cannon max_age_ticks must be at least 1")]
    ZeroBeamLifespan,
    #[error("control queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

impl SimConfig {
    /// Fixed delta time per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Deterministic config for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("PLANET_DRIFT_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid PLANET_DRIFT_SEED '{}', using entropy", seed),
            }
        }

        env_override("PLANET_DRIFT_TICK_RATE", &mut config.tick_rate);
        if config.tick_rate != clock::TICK_RATE && config.tick_rate > 0 {
            // Wave timers are defined in milliseconds
            config.debris.spawn_interval_ticks =
                clock::ms_to_ticks(debris::SPAWN_INTERVAL_MS, config.tick_rate);
            config.debris.special_spawn_interval_ticks =
                clock::ms_to_ticks(debris::SPECIAL_SPAWN_INTERVAL_MS, config.tick_rate);
        }
        env_override("PLANET_DRIFT_DISABLE_FAILURE", &mut config.disable_failure);
        env_override("PLANET_DRIFT_DETECT_COLLISIONS", &mut config.detect_collisions);
        env_override(
            "PLANET_DRIFT_WARP_CORE_ZEROES_WHEN_EMPTY",
            &mut config.warp_core_zeroes_when_empty,
        );

        env_override("PLANET_DRIFT_GAME_SPEED", &mut config.debris.game_speed);
        env_override("PLANET_DRIFT_DEBRIS_MIN_MASS", &mut config.debris.min_mass);
        env_override("PLANET_DRIFT_DEBRIS_MIN_DRIFT", &mut config.debris.min_drift_factor);
        env_override("PLANET_DRIFT_DEBRIS_PER_INTERVAL", &mut config.debris.count_per_interval);
        env_override("PLANET_DRIFT_DEBRIS_ON_START", &mut config.debris.count_on_start);

        if let Ok(lifetime) = std::env::var("PLANET_DRIFT_DEBRIS_LIFETIME_TICKS") {
            match lifetime.parse::<u64>() {
                Ok(0) => config.debris.lifetime_ticks = None,
                Ok(parsed) => config.debris.lifetime_ticks = Some(parsed),
                Err(_) => tracing::warn!(
                    "Invalid PLANET_DRIFT_DEBRIS_LIFETIME_TICKS '{}', using default",
                    lifetime
                ),
            }
        }

        env_override("PLANET_DRIFT_BEAM_SPEED", &mut config.cannon.beam_speed);
        env_override("PLANET_DRIFT_BEAM_MAX_AGE_TICKS", &mut config.cannon.max_age_ticks);
        env_override("PLANET_DRIFT_BEAM_MAX_LENGTH", &mut config.cannon.max_beam_length);

        env_override("PLANET_DRIFT_GRAVITY_FACTOR", &mut config.player.gravity_factor);
        env_override("PLANET_DRIFT_WARP_CORES", &mut config.player.starting_warp_cores);

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(ConfigError::EmptyField {
                width: self.field.width,
                height: self.field.height,
            });
        }
        if self.field.planet_thickness * 2.0 >= self.field.height {
            return Err(ConfigError::PlanetsOverlap {
                thickness: self.field.planet_thickness,
                height: self.field.height,
            });
        }
        if self.field.spawn_y_min > self.field.spawn_y_max {
            return Err(ConfigError::EmptySpawnBand {
                min: self.field.spawn_y_min,
                max: self.field.spawn_y_max,
            });
        }
        if !(self.debris.min_mass > 0.0 && self.debris.min_mass <= 1.0) {
            return Err(ConfigError::MinMassOutOfRange(self.debris.min_mass));
        }
        if !(self.debris.special_mass > 0.0 && self.debris.special_mass <= 1.0) {
            return Err(ConfigError::SpecialMassOutOfRange(self.debris.special_mass));
        }
        if !(self.debris.min_drift_factor > 0.0 && self.debris.min_drift_factor <= 1.0) {
            return Err(ConfigError::MinDriftOutOfRange(self.debris.min_drift_factor));
        }
        if !(self.debris.drift_per_tick * self.debris.game_speed > 0.0) {
            return Err(ConfigError::NoDrift {
                drift: self.debris.drift_per_tick,
                speed: self.debris.game_speed,
            });
        }
        if self.debris.spawn_interval_ticks == 0 || self.debris.special_spawn_interval_ticks == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if self.cannon.max_age_ticks == 0 {
            return Err(ConfigError::ZeroBeamLifespan);
        }
        if self.control_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

/// Overwrite `target` with a parsed environment variable, warning on bad input
fn env_override<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(name) {
        match raw.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", name, raw),
        }
    }
}
