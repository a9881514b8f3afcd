pub mod account;
pub mod network;
pub mod settings;

pub use account::*;
pub use network::*;
