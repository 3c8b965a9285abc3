pub mod admin;
pub mod hackathon;
pub mod organizer_user;
pub mod registered_hackathon;
pub mod student_user;
