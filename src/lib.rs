//! Holistic Profile - Privacy-gated aggregation API
//!
//! This crate serves a user's holistic profile (demographics, affects,
//! behavior, cognitive aspects, interests, physical state and social
//! relations) assembled from several per-user data sources, with every
//! category gated by a sharing flag the owner controls.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
