pub mod appointments;
pub mod auth;
pub mod booking;
pub mod cart;
pub mod favorites;
pub mod notifications;
pub mod params;
