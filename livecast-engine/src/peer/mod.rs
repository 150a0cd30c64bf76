mod candidate_queue;
mod close_flag;
mod peer_controller;

pub use candidate_queue::CandidateQueue;
pub use close_flag::CloseFlag;
pub use peer_controller::{ControllerOutput, PeerController};
