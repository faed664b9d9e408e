pub mod app;
pub mod capture;
pub mod core;
pub mod display;
pub mod session;
pub mod submit;
