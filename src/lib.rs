pub mod cli;
pub mod client;
pub mod dashboard;
pub mod gridfolio;
