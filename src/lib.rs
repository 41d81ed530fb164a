//! Autonomous behaviour engine for AI-controlled titans.
//!
//! [`ai`] holds the engine itself: a per-creature [`ai::TitanController`]
//! that picks targets, steers around obstacles and chooses attacks. The
//! remaining modules form a headless arena that drives controllers inside a
//! `hecs` world so the engine can be run and observed end to end.

pub mod ai;
pub mod app;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod obstacles;
pub mod spatial;
pub mod titan;

pub use config::ConfigError;
