//! Hatrack - per-character hat overlays for 16x32 sprite worlds
//!
//! This library provides functionality to:
//! - Discover hat sprite sheets and assign them stable ids
//! - Estimate per-character, per-direction hat offsets from character sheets
//! - Store, tune and persist those offsets
//! - Plan hat draws over a host's sprite batch
//! - Track which character wears which hat

pub mod analyze;
pub mod assignments;
pub mod calibration;
pub mod cli;
pub mod config;
pub mod direction;
pub mod offsets;
pub mod output;
pub mod overlay;
pub mod registry;
pub mod renderer;
pub mod spritesheet;
