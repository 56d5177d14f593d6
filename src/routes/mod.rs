pub mod calls;
pub mod dashboard;
pub mod health;
pub mod loads;
pub mod preferences;
