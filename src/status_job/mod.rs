//! Periodic reclassification of task status labels.
//!
//! [`StatusReclassifier`] runs the two independent jobs ("mark late" and
//! "mark done") once; [`StatusScheduler`] runs both on a fixed interval until
//! a shutdown signal arrives.

mod reclassifier;
mod scheduler;

pub use reclassifier::{ReclassificationReport, StatusJobKind, StatusReclassifier};
pub use scheduler::StatusScheduler;
