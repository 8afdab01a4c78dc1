//! Process-wide logging setup shared by the binaries.

/// Initialize process-wide tracing.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(subscriber::LogFormat::from_env());
}

/// Subscriber configuration (filter, output format).
pub mod subscriber;
