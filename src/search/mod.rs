//! Search-as-you-type for the operand boxes
//!
//! - `cache` - answer queries from known fragments
//! - `debounce` - quiet-window timer
//! - `coordinator` - per-box state machine with stale-result suppression

pub mod cache;
pub mod coordinator;
pub mod debounce;

pub use cache::match_query;
pub use coordinator::{OperandChange, SearchCoordinator, SearchEvent, SearchStatus};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
