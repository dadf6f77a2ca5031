pub mod city;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod paginate;
pub mod prompt;
pub mod reports;
pub mod shell;
pub mod stats;
pub mod table;
