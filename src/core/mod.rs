// Domain-layer modules and shared errors/models
pub mod intel {
    pub use crate::intel::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod cost {
    pub use crate::cost::*;
}

pub mod plans {
    pub use crate::plans::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
