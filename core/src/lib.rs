//! # netsweep-core
//!
//! The TCP connect scanning engine.
//!
//! * **[`network`]**: the single-target connection probe.
//! * **[`scanner`]**: the scheduler that walks an address space batch by batch
//!   through a bounded probe pool and reports progress to an observer.
//! * **[`report`]**: the text result sink and its reader.

pub mod network;
pub mod report;
pub mod scanner;

pub use scanner::run_scan;
