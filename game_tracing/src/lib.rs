//! Tracing span helpers shared across the engine.

/// Opens a `TRACE` level span scoped to the calling function/module.
///
/// This is a thin wrapper around [`tracing::span!`] so that call sites don't
/// need to spell out the level every time:
///
/// ```
/// let _span = game_tracing::trace_span!("MyType::my_method").entered();
/// ```
#[macro_export]
macro_rules! trace_span {
    ($name:expr) => {
        ::tracing::span!(::tracing::Level::TRACE, $name)
    };
    ($name:expr, $($field:tt)*) => {
        ::tracing::span!(::tracing::Level::TRACE, $name, $($field)*)
    };
}

#[cfg(feature = "tracy")]
pub fn start_tracy_client() {
    tracy_client::Client::start();
}
