//! Metric descriptions
//!
//! Counters and gauges are recorded through the `metrics` facade. Without
//! an installed recorder they cost nothing; embedders that want them
//! exported install their own recorder before calling [`init_metrics`].

use ::metrics::{describe_counter, describe_gauge};

/// Mutations accepted, labelled by `intent`
pub const MUTATIONS_APPLIED: &str = "chatcast.mutations.applied";

/// Mutations rejected by validation, labelled by `intent`
pub const MUTATIONS_REJECTED: &str = "chatcast.mutations.rejected";

/// Subscribers that received the most recent event
pub const BROADCAST_RECEIVERS: &str = "chatcast.broadcast.receivers";

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(MUTATIONS_APPLIED, "Number of accepted channel/message mutations");
    describe_counter!(MUTATIONS_REJECTED, "Number of rejected channel/message mutations");
    describe_gauge!(BROADCAST_RECEIVERS, "Subscribers reached by the last broadcast event");
}
