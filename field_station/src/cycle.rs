//! Fixed-period publish cycle.
//!
//! The registry does not schedule itself; this module supplies the
//! periodic loop that advances the simulation and publishes once per
//! control cycle, with drift-free pacing and O(1) timing statistics.
//!
//! Two pacing modes:
//! - `rt` feature: `clock_nanosleep(TIMER_ABSTIME)` on `CLOCK_MONOTONIC`
//!   after an RT setup sequence (mlockall, stack prefault, CPU pinning,
//!   `SCHED_FIFO`), for competition hardware.
//! - default: `Instant` + `std::thread::sleep`, for development machines.
//!
//! A publish cycle always runs to completion; overruns are counted and
//! logged, never aborted on.

use thiserror::Error;
use tracing::{info, warn};

use field_registry::{DashboardSink, FieldRegistry, TelemetrySink};

use crate::config::StationConfig;
use crate::sim::FieldSimulation;

/// Cycle loop error.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT setup (memory locking, affinity, scheduler) failed.
    #[error("RT setup failed: {0}")]
    RtSetup(String),
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
///
/// Updated every cycle with no allocation; min/max/avg cycle latency
/// plus overrun count.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of cycles that exceeded the period.
    pub overruns: u64,
    /// Maximum wake-up latency [ns] (expected vs. actual wake).
    pub max_latency_ns: i64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns;
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (0 before the first cycle).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Prefault stack pages so the paced loop takes no page faults.
#[cfg(feature = "rt")]
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Pin the current thread to a specific CPU core.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

/// Set SCHED_FIFO with the given RT priority.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

/// Perform the full RT setup sequence before entering the cycle loop.
///
/// Without the `rt` feature every step is a no-op, so callers can invoke
/// this unconditionally.
#[cfg(feature = "rt")]
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)
}

#[cfg(not(feature = "rt"))]
pub fn rt_setup(_cpu_core: usize, _rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the simulation, the registry and the pacing loop.
pub struct CycleRunner<D, T> {
    simulation: FieldSimulation,
    registry: FieldRegistry<D, T>,
    cycle_time_ns: i64,
    max_cycles: Option<u64>,
    stats_interval: u64,
    stats: CycleStats,
}

impl<D: DashboardSink, T: TelemetrySink> CycleRunner<D, T> {
    /// Create a runner from a validated configuration.
    pub fn new(
        config: &StationConfig,
        simulation: FieldSimulation,
        registry: FieldRegistry<D, T>,
    ) -> Self {
        Self {
            simulation,
            registry,
            cycle_time_ns: config.cycle.cycle_time_us as i64 * 1000,
            max_cycles: config.cycle.max_cycles,
            stats_interval: config.cycle.stats_interval,
            stats: CycleStats::new(),
        }
    }

    /// Timing statistics so far.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// The hosted registry.
    pub fn registry(&self) -> &FieldRegistry<D, T> {
        &self.registry
    }

    /// Mutable access to the hosted registry (e.g. shutdown flush).
    pub fn registry_mut(&mut self) -> &mut FieldRegistry<D, T> {
        &mut self.registry
    }

    /// One cycle: advance the simulation to elapsed time `t` seconds,
    /// then publish the field.
    pub fn cycle_body(&mut self, t: f64) {
        self.simulation.advance(t);
        self.registry.publish();
    }

    /// Enter the fixed-period loop. Returns after `max_cycles` when
    /// configured, otherwise runs until the process is stopped.
    pub fn run(&mut self) -> Result<(), CycleError> {
        #[cfg(feature = "rt")]
        {
            self.run_rt_loop()
        }

        #[cfg(not(feature = "rt"))]
        {
            self.run_paced_loop()
        }
    }

    /// Simulation time for a cycle index: deterministic, drift-free.
    fn sim_time(&self, cycle: u64) -> f64 {
        cycle as f64 * self.cycle_time_ns as f64 / 1e9
    }

    fn finish_cycle(&mut self, duration_ns: i64, latency_ns: i64) {
        self.stats.record(duration_ns, latency_ns);
        if duration_ns > self.cycle_time_ns {
            self.stats.overruns += 1;
            warn!(
                actual_us = duration_ns / 1000,
                budget_us = self.cycle_time_ns / 1000,
                "cycle overrun"
            );
        }
        if self.stats.cycle_count % self.stats_interval == 0 {
            info!(
                cycles = self.stats.cycle_count,
                avg_us = self.stats.avg_cycle_ns() / 1000,
                max_us = self.stats.max_cycle_ns / 1000,
                overruns = self.stats.overruns,
                "cycle statistics"
            );
        }
    }

    /// RT loop using `clock_nanosleep(TIMER_ABSTIME)` for absolute-time
    /// pacing on `CLOCK_MONOTONIC`.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self) -> Result<(), CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let mut next_wake = clock_gettime(clock)
            .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;

        for cycle in 0u64.. {
            next_wake = timespec_add_ns(next_wake, self.cycle_time_ns);

            let cycle_start = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;

            self.cycle_body(self.sim_time(cycle));

            let cycle_end = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
            let duration_ns = timespec_diff_ns(&cycle_end, &cycle_start);
            let latency_ns = timespec_diff_ns(&cycle_start, &next_wake)
                .saturating_add(self.cycle_time_ns)
                .abs();
            self.finish_cycle(duration_ns, latency_ns);

            if self.max_cycles.is_some_and(|max| cycle + 1 >= max) {
                return Ok(());
            }

            // Sleep until the next cycle boundary (absolute time).
            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    /// Development loop using `Instant` + `thread::sleep` pacing.
    #[cfg(not(feature = "rt"))]
    fn run_paced_loop(&mut self) -> Result<(), CycleError> {
        use std::time::{Duration, Instant};

        let cycle_duration = Duration::from_nanos(self.cycle_time_ns as u64);

        for cycle in 0u64.. {
            let cycle_start = Instant::now();

            self.cycle_body(self.sim_time(cycle));

            let elapsed = cycle_start.elapsed();
            self.finish_cycle(elapsed.as_nanos() as i64, 0);

            if self.max_cycles.is_some_and(|max| cycle + 1 >= max) {
                return Ok(());
            }

            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }
}

// ─── Timespec Helpers ───────────────────────────────────────────────

#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    const NSEC_PER_SEC: i64 = 1_000_000_000;
    let mut sec = ts.tv_sec();
    let mut nsec = ts.tv_nsec() + ns;
    sec += nsec / NSEC_PER_SEC;
    nsec %= NSEC_PER_SEC;
    if nsec < 0 {
        sec -= 1;
        nsec += NSEC_PER_SEC;
    }
    nix::sys::time::TimeSpec::new(sec, nsec)
}

#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}
