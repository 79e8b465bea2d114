//! Command implementations for witsml-cli

pub mod call;
pub mod cap;
pub mod servers;
pub mod version;

pub use call::call;
pub use cap::cap;
pub use servers::servers;
pub use version::version;
