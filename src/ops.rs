//! Combinators on [`Signal`](crate::signal::Signal).
//!
//! Every operator is an inherent method returning a new, cold signal; the
//! modules below only group them by concern.

mod aggregation;
mod buffer;
mod buffer_time;
mod catch_error;
mod combine_latest;
mod concat;
mod debounce;
mod delay;
mod distinct;
mod flat_map;
mod lifecycle;
mod map;
mod materialize;
mod merge;
mod observe_on;
mod retry;
mod scan;
mod skip;
mod switch_to_latest;
mod take;
mod take_until;
mod throttle;
mod timeout;
mod zip;

pub use observe_on::ScheduleMode;
pub use retry::RetryConfig;
