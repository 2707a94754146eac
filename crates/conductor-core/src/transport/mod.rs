pub(crate) mod controller;
pub(crate) mod fsm;

pub use controller::TransportController;
pub use fsm::{TransitionResult, TransportEvent, TransportFSM, TransportState};
