//! # Base types for tapchess
//!
//! This is an auxiliary crate for `tapchess`, which contains the coordinate, side and piece types.
//! It was split from the main crate, so everything declared here has no dependency on the board
//! or the clock.
//!
//! Normally you don't want to use this crate directly. Use `tapchess` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
