use std::fmt::Display;

use livecast_core::PlatformError;

pub(crate) fn platform_error(err: impl Display) -> PlatformError {
    PlatformError::new(format!("{err:#}"))
}
