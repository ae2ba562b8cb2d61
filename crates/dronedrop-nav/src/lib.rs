//! `dronedrop-nav` – grid navigation for the delivery fleet.
//!
//! Pure functions only; nothing here owns state.
//!
//! # Modules
//!
//! - [`movement`] – [`navigate`][movement::navigate]: replays a command
//!   sequence from a starting [`Pose`][dronedrop_types::Pose] and returns where
//!   the drone ends up.  [`plot_delivery`][movement::plot_delivery] uses it to
//!   pin a package's target from its origin route.
//! - [`synthesis`] – [`synthesize_route`][synthesis::synthesize_route]: builds
//!   a fresh command sequence that flies from one pose to another grid cell,
//!   letting a drone chain deliveries without returning to base in between.

pub mod movement;
pub mod synthesis;

pub use movement::{navigate, navigate_str, plot_delivery};
pub use synthesis::synthesize_route;
