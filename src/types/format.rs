#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Texel formats. A subset of the formats modern APIs share; the backend translates these to
/// native format enums through a static table.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxFormat {
    UNDEFINED,
    R8_UNORM,
    R8_UINT,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R8G8B8A8_UINT,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R10G10B10A2_UNORM,
    R11G11B10_FLOAT,
    R16_FLOAT,
    R16_UINT,
    R16G16_FLOAT,
    R16G16B16A16_FLOAT,
    R16G16B16A16_UINT,
    R32_FLOAT,
    R32_UINT,
    R32_SINT,
    R32G32_FLOAT,
    R32G32B32_FLOAT,
    R32G32B32A32_FLOAT,
    R32G32B32A32_UINT,
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
    BC1_UNORM,
    BC3_UNORM,
    BC7_UNORM,
}

impl Default for OnyxFormat {
    fn default() -> Self {
        OnyxFormat::UNDEFINED
    }
}

impl OnyxFormat {
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            OnyxFormat::D16_UNORM | OnyxFormat::D24_UNORM_S8_UINT | OnyxFormat::D32_FLOAT
        )
    }

    pub fn has_stencil(self) -> bool {
        self == OnyxFormat::D24_UNORM_S8_UINT
    }

    /// True for formats whose channels are integers. Storage descriptors over these formats must
    /// be cleared through the uint clear path.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            OnyxFormat::R8_UINT
                | OnyxFormat::R8G8B8A8_UINT
                | OnyxFormat::R16_UINT
                | OnyxFormat::R16G16B16A16_UINT
                | OnyxFormat::R32_UINT
                | OnyxFormat::R32_SINT
                | OnyxFormat::R32G32B32A32_UINT
        )
    }

    /// Bytes per texel (per block for compressed formats)
    pub fn block_size(self) -> u32 {
        match self {
            OnyxFormat::UNDEFINED => 0,
            OnyxFormat::R8_UNORM | OnyxFormat::R8_UINT => 1,
            OnyxFormat::R16_FLOAT | OnyxFormat::R16_UINT | OnyxFormat::D16_UNORM => 2,
            OnyxFormat::R8G8B8A8_UNORM
            | OnyxFormat::R8G8B8A8_SRGB
            | OnyxFormat::R8G8B8A8_UINT
            | OnyxFormat::B8G8R8A8_UNORM
            | OnyxFormat::B8G8R8A8_SRGB
            | OnyxFormat::R10G10B10A2_UNORM
            | OnyxFormat::R11G11B10_FLOAT
            | OnyxFormat::R16G16_FLOAT
            | OnyxFormat::R32_FLOAT
            | OnyxFormat::R32_UINT
            | OnyxFormat::R32_SINT
            | OnyxFormat::D24_UNORM_S8_UINT
            | OnyxFormat::D32_FLOAT => 4,
            OnyxFormat::R16G16B16A16_FLOAT
            | OnyxFormat::R16G16B16A16_UINT
            | OnyxFormat::R32G32_FLOAT
            | OnyxFormat::BC1_UNORM => 8,
            OnyxFormat::R32G32B32_FLOAT => 12,
            OnyxFormat::R32G32B32A32_FLOAT
            | OnyxFormat::R32G32B32A32_UINT
            | OnyxFormat::BC3_UNORM
            | OnyxFormat::BC7_UNORM => 16,
        }
    }
}
