pub mod dashboard;
pub mod protected;
pub mod public;
