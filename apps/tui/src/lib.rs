//! shellpilot terminal front end.

pub mod app;
pub mod cli;
pub mod events;
pub mod icons;
pub mod theme;
pub mod views;
