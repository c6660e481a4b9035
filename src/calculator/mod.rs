pub mod benefits;
pub mod currency;
