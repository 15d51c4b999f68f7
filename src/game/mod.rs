pub mod constants;
pub mod control;
pub mod events;
pub mod ledger;
pub mod scoring;
pub mod session;
pub mod state;
pub mod systems;
