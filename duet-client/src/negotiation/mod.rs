mod negotiation_machine;
mod negotiation_session;
mod negotiation_state;

pub use negotiation_machine::*;
pub use negotiation_session::*;
pub use negotiation_state::*;
