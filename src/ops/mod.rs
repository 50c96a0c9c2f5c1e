pub mod detail;
pub mod drag;
pub mod mention;
