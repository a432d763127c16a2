//! REST route definitions
//!
//! Every route group exposes a `router()`; [`crate::app::build_app`] merges
//! them. The streaming lookup is not merged: it only runs for paths the
//! static client does not serve.

pub mod error;
pub mod leaderboard;
pub mod movielink;
pub mod streaming;
pub mod thespians;
pub mod token;

pub use error::{ApiError, ApiResult};
