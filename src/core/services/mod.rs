//! Tracker domain services.
use std::sync::Arc;

use filemesh_configuration::Configuration;

use crate::core::{persistence, Tracker};

/// It returns a new tracker building its dependencies.
#[must_use]
pub fn tracker_factory(config: &Configuration) -> Tracker {
    let persistence = Arc::new(persistence::build(&config.core.snapshot_path));

    Tracker::new(&config.core, persistence)
}
