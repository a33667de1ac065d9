use std::sync::Arc;

use tokio::sync::Mutex;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

/// A game shared between the input loop, the clock ticker and estimation tasks.
pub type SharedGame = Arc<Mutex<services::game::Game>>;
