pub mod clock;
pub mod compute;
pub mod config;
pub mod display;
pub mod engine;
pub mod entities;
pub mod input;
pub mod render;
