pub mod bookings;
pub mod services;
pub mod vehicles;
pub mod workshops;
