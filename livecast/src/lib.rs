pub use livecast_engine::{
    SessionConfig, SessionError, SessionEvent, SessionHandle, StreamingMode, StreamingSession,
};

pub mod model {
    pub use livecast_core::model::*;
}

pub mod engine {
    pub use livecast_engine::*;
}

#[cfg(feature = "web")]
pub mod web {
    pub use livecast_web::*;
}

#[cfg(feature = "native")]
pub mod native {
    pub use livecast_native::*;
}
