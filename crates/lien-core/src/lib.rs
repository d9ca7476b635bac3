pub mod error;
pub mod fixed_point;
pub mod types;

#[cfg(feature = "interest")]
pub mod interest;

#[cfg(feature = "waterfall")]
pub mod waterfall;

#[cfg(feature = "payment")]
pub mod payment;

#[cfg(feature = "ledger")]
pub mod ledger;

pub use error::LienError;
pub use types::*;

/// Standard result type for all lien-core operations
pub type LienResult<T> = Result<T, LienError>;
