pub mod analytics;
pub mod margin;
pub mod payroll;
pub mod period;
