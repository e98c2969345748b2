//! # Gravity Checkers
//!
//! Rule engine and move-selection AI for a board game that mixes Connect
//! Four style gravity drops with checkers movement: diagonal steps, forced
//! and chained captures, and king promotion. Four in a row wins.
//!
//! ## Modules
//!
//! - [`game`] — Grid topology and connectivity, pieces, move legality, game state
//! - [`ai`] — Agent trait, alpha-beta search over column drops, random agent
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
