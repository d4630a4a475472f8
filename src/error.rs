use std::sync::Arc;

pub type OnyxResult<T> = Result<T, OnyxError>;

/// Generic error that contains all the different kinds of errors that may occur when using the API
#[derive(Debug, Clone)]
pub enum OnyxError {
    StringError(String),
    IoError(Arc<std::io::Error>),
    /// A description struct or argument was malformed (for example a null wrapped resource or a
    /// view over the wrong resource dimension)
    InvalidArgument(String),
    /// The request is valid but the backend cannot express it (for example a subresource range
    /// beyond the packed-range capacity)
    Unsupported(String),
    /// A native call returned a failure code. `call` is the literal native entry point name.
    #[cfg(feature = "onyx-dx11")]
    NativeCallFailed { call: &'static str, result: i32 },
}

impl std::error::Error for OnyxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            OnyxError::StringError(_) => None,
            OnyxError::IoError(ref e) => Some(&**e),
            OnyxError::InvalidArgument(_) => None,
            OnyxError::Unsupported(_) => None,
            #[cfg(feature = "onyx-dx11")]
            OnyxError::NativeCallFailed { .. } => None,
        }
    }
}

impl core::fmt::Display for OnyxError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            OnyxError::StringError(ref e) => e.fmt(fmt),
            OnyxError::IoError(ref e) => e.fmt(fmt),
            OnyxError::InvalidArgument(ref e) => write!(fmt, "invalid argument: {}", e),
            OnyxError::Unsupported(ref e) => write!(fmt, "unsupported: {}", e),
            #[cfg(feature = "onyx-dx11")]
            OnyxError::NativeCallFailed { call, result } => {
                write!(fmt, "{} failed with result {:#x}", call, result)
            }
        }
    }
}

impl From<&str> for OnyxError {
    fn from(str: &str) -> Self {
        OnyxError::StringError(str.to_string())
    }
}

impl From<String> for OnyxError {
    fn from(string: String) -> Self {
        OnyxError::StringError(string)
    }
}

impl From<std::io::Error> for OnyxError {
    fn from(error: std::io::Error) -> Self {
        OnyxError::IoError(Arc::new(error))
    }
}
