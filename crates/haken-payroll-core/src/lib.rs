pub mod config;
pub mod error;
pub mod format;
pub mod record;
pub mod types;

#[cfg(feature = "payroll")]
pub mod payroll;

#[cfg(feature = "period")]
pub mod period;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use error::PayrollError;
pub use types::*;

/// Standard result type for all haken-payroll operations
pub type PayrollResult<T> = Result<T, PayrollError>;
