pub mod event;
pub mod generator;
pub mod level;
pub mod session;
