mod admin;
mod auth;
mod common;
mod hackathon;
mod proposal;
