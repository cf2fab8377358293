pub mod catalog;
pub mod config;
pub mod export;
pub mod history;
pub mod intake;
pub mod mapping;
pub mod models;
pub mod parse;
pub mod runner;
pub mod util;
pub mod validation;
pub mod wizard;

pub mod cli;
pub mod error;
