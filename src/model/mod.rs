pub mod employee;
pub mod method;
