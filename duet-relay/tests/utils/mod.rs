pub mod test_relay;

pub use test_client::*;
pub use test_relay::*;
