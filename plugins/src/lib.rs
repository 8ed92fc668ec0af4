pub mod collector;
pub mod factory;
pub mod gates;
