pub mod aggregate;
pub mod calc;
