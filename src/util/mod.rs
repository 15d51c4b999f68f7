pub mod angle;
pub mod rng;
pub mod vec2;
