/*
 * Error type for the edges of the crate: window class registration, native window
 * creation and configuration validation. The message protocol itself never fails;
 * platform failures inside message handling are absorbed, retried or defended against
 * with liveness checks, so nothing in `MessageHandler::dispatch` returns this type.
 */

#[derive(Debug)]
pub enum PlatformError {
    /// A one-time setup step (class registration, window creation) failed.
    InitializationFailed(String),
    /// A platform call failed after initialization.
    OperationFailed(String),
    /// A native handle was null or no longer refers to a live window.
    InvalidHandle(String),
    /// A `HandlerConfig` value is outside its allowed range.
    InvalidConfig(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            Self::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
            Self::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}

// Lets `?` be used directly on `windows::core::Result<T>` inside the Win32 backend.
#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(e: windows::core::Error) -> Self {
        Self::OperationFailed(format!("{} (HRESULT {:#010x})", e.message(), e.code().0))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
