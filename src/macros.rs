//! Per-subsystem log macros, one logger target per module.

/// Writes a debug! message to the core::cache logger.
#[macro_export]
macro_rules! cache_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "core::cache", $($arg)+)
    };
}

/// Writes an info! message to the core::cache logger.
#[macro_export]
macro_rules! cache_info {
    ($($arg:tt)+) => {
        log::info!(target: "core::cache", $($arg)+)
    };
}

/// Writes a warn! message to the core::cache logger.
#[macro_export]
macro_rules! cache_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "core::cache", $($arg)+)
    };
}

/// Writes an error! message to the core::cache logger.
#[macro_export]
macro_rules! cache_error {
    ($($arg:tt)+) => {
        log::error!(target: "core::cache", $($arg)+)
    };
}

/// Writes a debug! message to the core::search logger.
#[macro_export]
macro_rules! search_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "core::search", $($arg)+)
    };
}

/// Writes an info! message to the core::search logger.
#[macro_export]
macro_rules! search_info {
    ($($arg:tt)+) => {
        log::info!(target: "core::search", $($arg)+)
    };
}

/// Writes a debug! message to the core::expander logger.
#[macro_export]
macro_rules! expander_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "core::expander", $($arg)+)
    };
}

/// Writes an info! message to the core::expander logger.
#[macro_export]
macro_rules! expander_info {
    ($($arg:tt)+) => {
        log::info!(target: "core::expander", $($arg)+)
    };
}

/// Writes a debug! message to the core::orchestrator logger.
#[macro_export]
macro_rules! orchestrator_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "core::orchestrator", $($arg)+)
    };
}

/// Writes an info! message to the core::orchestrator logger.
#[macro_export]
macro_rules! orchestrator_info {
    ($($arg:tt)+) => {
        log::info!(target: "core::orchestrator", $($arg)+)
    };
}

/// Writes a debug! message to the core::revalidate logger.
#[macro_export]
macro_rules! revalidate_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "core::revalidate", $($arg)+)
    };
}

/// Writes an info! message to the core::revalidate logger.
#[macro_export]
macro_rules! revalidate_info {
    ($($arg:tt)+) => {
        log::info!(target: "core::revalidate", $($arg)+)
    };
}

/// Writes a warn! message to the core::revalidate logger.
#[macro_export]
macro_rules! revalidate_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "core::revalidate", $($arg)+)
    };
}

/// Writes an error! message to the core::revalidate logger.
#[macro_export]
macro_rules! revalidate_error {
    ($($arg:tt)+) => {
        log::error!(target: "core::revalidate", $($arg)+)
    };
}
