//! Goo Evolution player library
//!
//! The per-frame controller for a dual-stick blob that spits, sucks up goo,
//! and grows through a staged evolution, plus the Bevy + Rapier plumbing that
//! hosts it.

pub mod config;
pub mod constants;
pub mod error;
pub mod player;
