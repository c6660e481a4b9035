pub mod calculator;
pub mod consts;
pub mod model;
pub mod persistence;
pub mod store;
