pub mod appointment_service;
pub mod auth_service;
pub mod booking_service;
pub mod cart_service;
pub mod favorite_service;
pub mod notification_service;
pub mod profile_service;
pub mod salon_service;
