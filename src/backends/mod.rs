#[cfg(feature = "onyx-dx11")]
pub mod dx11;

#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
#[doc(hidden)]
#[rustfmt::skip]
pub mod empty;
