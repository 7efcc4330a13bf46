//! Scouting pass over a team's earlier events
//!
//! This module is the batch caller of the rating engine: it resolves records
//! through a source, rates each event independently, and assembles per-team
//! reports.

pub mod event;
pub mod report;

// Re-export commonly used types
pub use event::{
    charge_station_states, compute_event, fill_charge_station, qualifying_matches, rate_statistics,
    ChargeStationStates, EventRatings,
};
pub use report::{EventMetrics, Scout, TeamReport};
