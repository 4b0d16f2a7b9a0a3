pub mod booking;
pub mod cache;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod response;
pub mod scope;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
