pub mod config;
pub mod descriptor;
pub mod errors;
pub mod fs;
pub mod index;
pub mod project;
pub mod resolution;
pub mod types;
