//! Thespian server
//!
//! Backend for the thespian trivia game: stores actors and the leaderboard,
//! hands the movie-database token to the browser client, checks streaming
//! availability and scrapes playable movie links.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod services;

pub use app::{AppState, build_app};
