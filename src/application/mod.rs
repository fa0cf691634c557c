// Application layer - the session facade and report building consumed by
// any presentation client (the interactive shell, or an embedding caller).

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
