use crate::error::Result;
use std::sync::{atomic::AtomicBool, Arc, OnceLock};

static SHUTDOWN: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Flag raised by SIGINT/SIGTERM.
///
/// Handlers are registered on the first call; later calls return the same flag.
/// Waits in the scheduler watch this flag and end early once it is raised.
#[cfg(unix)]
pub fn install_signal_handlers() -> Result<Arc<AtomicBool>> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    if let Some(flag) = SHUTDOWN.get() {
        return Ok(flag.clone());
    }
    let flag = SHUTDOWN
        .get_or_init(|| Arc::new(AtomicBool::new(false)))
        .clone();

    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, flag.clone())?;
    }

    Ok(flag)
}

#[cfg(not(unix))]
pub fn install_signal_handlers() -> Result<Arc<AtomicBool>> {
    tracing::warn!("signal handling unavailable on this platform; stop the process externally");
    Ok(SHUTDOWN
        .get_or_init(|| Arc::new(AtomicBool::new(false)))
        .clone())
}
