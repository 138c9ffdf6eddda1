//! Movie Maths - add and subtract movies in the terminal
//!
//! Pick two movies, choose `+` or `-`, and a remote compute service answers
//! with a third movie.
//!
//! # Modules
//!
//! - `models` - Movies, operators, result slots and the search cache
//! - `api` - TMDB and compute-service clients behind [`MovieService`]
//! - `search` - Debounced, cache-first search per operand box
//! - `equation` - Operands, operator and the derived result
//! - `generation` - Request tokens for most-recent-wins completion
//! - `ui` - TUI components
//! - `app` - Application state and key handling

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod equation;
pub mod error;
pub mod generation;
pub mod models;
pub mod search;
pub mod ui;

// Re-export commonly used types
pub use models::{CacheRecord, Movie, Operator, ResultSlot, SearchCache, Slot};

pub use api::{ComputeClient, MetadataClient, MovieService, TmdbClient};
pub use app::{App, AppEvent};
pub use config::Config;
pub use equation::{EquationEngine, EquationEvent};
pub use error::{ComputeError, ProviderError};
pub use search::{SearchCoordinator, SearchEvent};
