//! # netsweep-common
//!
//! Domain models shared by the scanning engine and its front ends.
//!
//! * **[`network`]**: the scan input space (addresses, ports) and [`network::target::Target`].
//! * **[`error`]**: the validation error taxonomy.
//! * **[`config`]**: run-time tunables.

pub mod config;
pub mod error;
pub mod network;
