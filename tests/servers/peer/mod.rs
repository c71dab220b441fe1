use filemesh::servers::peer::PeerHandler;
use filemesh::servers::tcp::states::Running;

pub mod contract;
pub mod environment;

pub type Started = environment::Environment<Running<PeerHandler>>;
