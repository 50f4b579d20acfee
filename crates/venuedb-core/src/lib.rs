//! Shared venue model and run configuration for venuedb.

pub mod app_config;
pub mod config;
pub mod venue;
pub mod venue_map;

mod error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use venue::{
    Coordinates, GuestRange, LocationType, ReviewScore, SinkDocument, Venue, VenueDetails,
    UNBOUNDED_GUESTS,
};
pub use venue_map::VenueMap;
