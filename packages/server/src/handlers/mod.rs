pub mod admin;
pub mod auth;
pub mod hackathon;
pub mod proposal;
pub mod registration;
