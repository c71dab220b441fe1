use filemesh::servers::tcp::states::Running;
use filemesh::servers::tracker::TrackerHandler;

pub mod contract;

pub type Started = environment::Environment<Running<TrackerHandler>>;
