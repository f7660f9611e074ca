pub mod calendar;
pub mod clock;
pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod registry;
pub mod snapshot;
pub mod space;
