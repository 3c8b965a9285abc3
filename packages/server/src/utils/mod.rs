pub mod filename;
pub mod hash;
pub mod ids;
pub mod jwt;
