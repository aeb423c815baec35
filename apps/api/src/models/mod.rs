pub mod profile;
pub mod training;
