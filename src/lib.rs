//! Planet Drift simulation core
//!
//! A headless, deterministic fixed-step simulation of a craft drifting between
//! two planets. The craft's vertical drive comes from the mass balance of the
//! debris it has collected from each planet; a push/pull gravity cannon
//! captures or repels drifting debris.
//!
//! Input arrives as [`game::control::ControlEvent`]s and
//! [`game::events::CollisionEvent`]s; every tick returns the
//! [`game::events::SimEvent`]s a presentation layer needs.

pub mod config;
pub mod game;
pub mod util;
