//! Menu selection driven by joystick input
//!
//! - `selection`: the Idle/Confirmed state machine over a choice index
//! - `session`: the polling loop that feeds it and reports to a presenter

pub mod selection;
pub mod session;

pub use selection::{Direction, Phase, SelectionError, SelectionEvent, SelectionState};
pub use session::{Presenter, Session, SessionConfig, SessionOutcome, DEFAULT_POLL_INTERVAL};
