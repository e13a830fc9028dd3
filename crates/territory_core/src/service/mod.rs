//! Core use-case services.
//!
//! # Responsibility
//! - Compose configuration with the pure planning functions.
//! - Keep CLI and other hosts decoupled from module layout.

pub mod planner_service;
