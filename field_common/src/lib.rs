//! Field Common Library
//!
//! This crate provides the shared vocabulary of the field telemetry
//! workspace: pose geometry, the tracked-object capability traits,
//! configuration loading utilities and system constants.
//!
//! # Module Structure
//!
//! - [`geometry`] - Planar and spatial pose types
//! - [`object`] - Capability traits implemented by pose producers
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - System-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use field_common::prelude::*;
//!
//! let pose = Pose2d::new(1.0, 2.0, 0.0);
//! let embedded = Pose3d::from_pose2d(pose);
//! assert_eq!(embedded.to_pose2d(), pose);
//! ```

pub mod config;
pub mod consts;
pub mod geometry;
pub mod object;
pub mod prelude;
