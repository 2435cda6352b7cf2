//! # Smoothed Conditional Distributions
//!
//! Counting ([`freq`]) and Lidstone estimation ([`lidstone`]) shared by the
//! emission and transition models.

pub mod freq;
pub mod lidstone;

pub use freq::{ConditionalFreqDist, FreqDist};
pub use lidstone::{ConditionalProbDist, DEFAULT_GAMMA, LidstoneDist};
