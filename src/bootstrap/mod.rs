//! Application bootstrapping.
//!
//! This module includes all the functions to build the application, its
//! dependencies, and run the jobs.
//!
//! Jobs are tasks executed concurrently: the tracker server, the peer data
//! server and, when enabled, the stale seed sweep.
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
