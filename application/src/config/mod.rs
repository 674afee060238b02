//! Application-level configuration types.

pub mod fleet_params;

pub use fleet_params::FleetParams;
