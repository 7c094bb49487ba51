//! Whole-diagram simulation.
//!
//! The [`Simulator`] owns a diagram and drives it: starting activates every
//! pickup and jack, stopping detaches them and zeroes all voltages. Changes
//! made through the simulator restart a running simulation so that stale
//! voltages never survive a rewiring.

mod simulator;

pub use simulator::{SimulationConfig, Simulator};
