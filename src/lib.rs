pub mod cli;
pub mod config;
pub mod schema;
pub mod util;
pub mod web;
