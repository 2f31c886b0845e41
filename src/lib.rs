pub mod bbox;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod object;
pub mod stable_tracker;
pub mod tracked_object;

#[cfg(test)]
mod test_stable_tracker;

pub use bbox::BoundingBox;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::TrackerConfig;
pub use error::TrackError;
pub use frame::FrameData;
pub use object::Detection;
pub use stable_tracker::{StableTracker, TrackSnapshot};
pub use tracked_object::TrackedObject;
