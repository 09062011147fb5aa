pub mod auth;
pub mod classify;
pub mod completion;
pub mod config;
pub mod terminal;
