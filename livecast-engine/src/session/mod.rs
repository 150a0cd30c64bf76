mod controllers;
mod session_command;
mod session_config;
mod session_event;
mod session_handle;
mod streaming_session;

pub use controllers::Controllers;
pub use session_command::SessionCommand;
pub use session_config::SessionConfig;
pub use session_event::SessionEvent;
pub use session_handle::{AttemptSlot, SessionHandle};
pub use streaming_session::StreamingSession;
