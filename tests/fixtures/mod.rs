//! Test fixtures for trip-router.
//!
//! Provides realistic test data including:
//! - Real Dar es Salaam delivery locations (from OpenStreetMap)
//! - A scripted reasoning client and a failing trip store

#![allow(dead_code)]

pub mod dar_es_salaam_locations;
pub mod collaborators;

pub use collaborators::*;
pub use dar_es_salaam_locations::*;
