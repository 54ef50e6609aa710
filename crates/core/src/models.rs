pub mod booking;
pub mod service;
pub mod user;
pub mod vehicle;
pub mod workshop;
