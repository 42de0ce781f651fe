//! # Field Object Registry
//!
//! In-process registry of everything on the competition field right now:
//! the primary robot, opponent robots and game pieces. The registry
//! stores non-owning handles grouped by type name and, once per control
//! cycle, projects every tracked pose to two observers:
//!
//! - a **dashboard overlay** (planar poses only, one layer per type name)
//! - a **structured-log sink** (full spatial poses, one channel per type)
//!
//! The registry does not update the field state itself; pose producers
//! (the pose estimator during a real match, simulators during a simulated
//! one) own the objects and are queried on demand at publish time.
//!
//! ## Zero-Allocation Publish
//!
//! The per-cycle projection reuses pre-allocated scratch buffers and the
//! per-type log paths are computed once at registration, so a steady-state
//! publish performs no heap allocation of its own.

pub mod registry;
pub mod sinks;

pub use registry::FieldRegistry;
pub use sinks::{DashboardSink, SinkError, TelemetrySink};
