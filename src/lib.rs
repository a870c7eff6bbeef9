//! CineScope: a terminal movie discovery and bookmark app backed by OMDb

pub mod config;
pub mod logging;
pub mod model;
pub mod controller;
pub mod view;
