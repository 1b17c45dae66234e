pub mod models;
pub mod outputs;
pub mod scrapers;
