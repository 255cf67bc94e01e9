//! Record types produced by the scraper.

pub mod venue;

pub use venue::{Venue, VenueRecord, venue_schema};
