pub mod countdown_tick;
pub mod driver_match;
pub mod session_cancel;
pub mod session_started;
