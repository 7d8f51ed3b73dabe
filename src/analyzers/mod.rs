//! Rating aggregation and insight generation.
//!
//! This module groups ratings by facility, academic year, major and time of
//! day, derives narrative insights and monthly trends from those groups, and
//! combines everything into a single dashboard payload.

pub mod aggregate;
pub mod dashboard;
pub mod insights;
pub mod types;
pub mod utility;
