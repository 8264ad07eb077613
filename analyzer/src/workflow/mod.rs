pub mod collaborators;
pub mod config;
pub mod runner;
