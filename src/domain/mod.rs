mod account;
mod money;
mod pricing;
mod transaction;

pub use account::*;
pub use money::*;
pub use pricing::*;
pub use transaction::*;
