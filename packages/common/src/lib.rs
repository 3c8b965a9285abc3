pub mod config;
pub mod hackathon;
pub mod registration_status;
pub mod storage;

pub use hackathon::{HackathonKind, HackathonPhase};
pub use registration_status::{RegistrationStatus, ReviewDecision};
