pub mod config;
pub mod game;
pub mod output;
pub mod scoring;
