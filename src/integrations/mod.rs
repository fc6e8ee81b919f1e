//! External service integrations.

pub mod services {
    pub use crate::services::*;
}

pub mod dns_check {
    pub use crate::dns_check::*;
}

pub mod endpoint_chain {
    pub use crate::endpoint_chain::*;
}
