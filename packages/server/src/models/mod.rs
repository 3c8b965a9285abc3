pub mod admin;
pub mod auth;
pub mod hackathon;
pub mod registration;
pub mod shared;
