pub mod calculator;
pub mod margin;
pub mod paid_leave;
pub mod premiums;
