pub mod engine;
pub mod pose;
pub mod utils;
