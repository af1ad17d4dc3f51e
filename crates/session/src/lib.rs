//! Selection state for a discovery session.
//!
//! Pure, synchronous building blocks with no I/O:
//! - [`Mode`] / [`Selection`]: which discovery strategy is active and what
//!   the user picked for it
//! - [`SelectionStateMachine`]: validated transitions over that state
//! - [`ResultWindow`]: top-K prefix view over a ranked result

pub mod error;
pub mod mode;
pub mod state_machine;
pub mod window;

pub use error::{Result, SelectionError};
pub use mode::{
    DEFAULT_USER_LIMIT, Mode, Phase, RECOMMENDATION_LIMIT, Selection, SelectionSnapshot,
};
pub use state_machine::SelectionStateMachine;
pub use window::{
    DEFAULT_WINDOW, MAX_WINDOW, RecommendationResult, ResultWindow, clamp_window, visible,
};
