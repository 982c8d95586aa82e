//! Pixel format inference
//!
//! Maps an internal pixel-storage format code to its base channel layout.
//! The codes are the GL-style enums the SPI traffics in; the helper is a
//! pure total function so backends can derive upload/readback formats
//! without consulting the native API.

/// Base channel layout of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
    Depth,
    Stencil,
    DepthStencil,
}

// Base formats.
pub const RED: u32 = 0x1903;
pub const RG: u32 = 0x8227;
pub const RGB: u32 = 0x1907;
pub const RGBA: u32 = 0x1908;
pub const DEPTH_COMPONENT: u32 = 0x1902;
pub const STENCIL_INDEX: u32 = 0x1901;
pub const DEPTH_STENCIL: u32 = 0x84F9;

// Sized one- and two-channel formats.
pub const R8: u32 = 0x8229;
pub const R8_SNORM: u32 = 0x8F94;
pub const R16: u32 = 0x822A;
pub const R16_SNORM: u32 = 0x8F98;
pub const R16F: u32 = 0x822D;
pub const R32F: u32 = 0x822E;
pub const R8I: u32 = 0x8231;
pub const R8UI: u32 = 0x8232;
pub const R16I: u32 = 0x8233;
pub const R16UI: u32 = 0x8234;
pub const R32I: u32 = 0x8235;
pub const R32UI: u32 = 0x8236;
pub const RG8: u32 = 0x822B;
pub const RG8_SNORM: u32 = 0x8F95;
pub const RG16: u32 = 0x822C;
pub const RG16_SNORM: u32 = 0x8F99;
pub const RG16F: u32 = 0x822F;
pub const RG32F: u32 = 0x8230;
pub const RG8I: u32 = 0x8237;
pub const RG8UI: u32 = 0x8238;
pub const RG16I: u32 = 0x8239;
pub const RG16UI: u32 = 0x823A;
pub const RG32I: u32 = 0x823B;
pub const RG32UI: u32 = 0x823C;

// Sized three-channel formats.
pub const R3_G3_B2: u32 = 0x2A10;
pub const RGB4: u32 = 0x804F;
pub const RGB5: u32 = 0x8050;
pub const RGB8: u32 = 0x8051;
pub const RGB8_SNORM: u32 = 0x8F96;
pub const RGB10: u32 = 0x8052;
pub const RGB12: u32 = 0x8053;
pub const RGB16: u32 = 0x8054;
pub const RGB16_SNORM: u32 = 0x8F9A;
pub const SRGB8: u32 = 0x8C41;
pub const RGB16F: u32 = 0x881B;
pub const RGB32F: u32 = 0x8815;
pub const R11F_G11F_B10F: u32 = 0x8C3A;
pub const RGB8I: u32 = 0x8D8F;
pub const RGB8UI: u32 = 0x8D7D;
pub const RGB16I: u32 = 0x8D89;
pub const RGB16UI: u32 = 0x8D77;
pub const RGB32I: u32 = 0x8D83;
pub const RGB32UI: u32 = 0x8D71;

// Sized four-channel formats.
pub const RGBA2: u32 = 0x8055;
pub const RGBA4: u32 = 0x8056;
pub const RGB5_A1: u32 = 0x8057;
pub const RGBA8: u32 = 0x8058;
pub const RGBA8_SNORM: u32 = 0x8F97;
pub const RGB10_A2: u32 = 0x8059;
pub const RGB10_A2UI: u32 = 0x906F;
pub const RGBA12: u32 = 0x805A;
pub const RGBA16: u32 = 0x805B;
pub const RGBA16_SNORM: u32 = 0x8F9B;
pub const SRGB8_ALPHA8: u32 = 0x8C43;
pub const RGBA16F: u32 = 0x881A;
pub const RGBA32F: u32 = 0x8814;
pub const RGBA8I: u32 = 0x8D8E;
pub const RGBA8UI: u32 = 0x8D7C;
pub const RGBA16I: u32 = 0x8D88;
pub const RGBA16UI: u32 = 0x8D76;
pub const RGBA32I: u32 = 0x8D82;
pub const RGBA32UI: u32 = 0x8D70;

// Generic and S3TC compressed formats.
pub const COMPRESSED_RED: u32 = 0x8225;
pub const COMPRESSED_RG: u32 = 0x8226;
pub const COMPRESSED_RGB: u32 = 0x84ED;
pub const COMPRESSED_RGBA: u32 = 0x84EE;
pub const COMPRESSED_SRGB: u32 = 0x8C48;
pub const COMPRESSED_SRGB_ALPHA: u32 = 0x8C49;
pub const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT1: u32 = 0x83F1;
pub const COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;

// Depth and depth/stencil formats.
pub const DEPTH_COMPONENT16: u32 = 0x81A5;
pub const DEPTH_COMPONENT24: u32 = 0x81A6;
pub const DEPTH_COMPONENT32: u32 = 0x81A7;
pub const DEPTH_COMPONENT32F: u32 = 0x8CAC;
pub const DEPTH24_STENCIL8: u32 = 0x88F0;
pub const DEPTH32F_STENCIL8: u32 = 0x8CAD;

/// Infer the base channel layout for an internal format code.
///
/// Total over any `u32`: unrecognized codes fall back to [`BaseFormat::Rgba`].
pub fn base_format(internal_format: u32) -> BaseFormat {
    match internal_format {
        RED | COMPRESSED_RED | R8 | R8_SNORM | R16 | R16_SNORM | R16F | R32F | R8I | R8UI
        | R16I | R16UI | R32I | R32UI => BaseFormat::Red,

        RG | COMPRESSED_RG | RG8 | RG8_SNORM | RG16 | RG16_SNORM | RG16F | RG32F | RG8I
        | RG8UI | RG16I | RG16UI | RG32I | RG32UI => BaseFormat::Rg,

        RGB | COMPRESSED_RGB | COMPRESSED_SRGB | COMPRESSED_RGB_S3TC_DXT1 | R3_G3_B2 | RGB4
        | RGB5 | RGB8 | RGB8_SNORM | RGB10 | RGB12 | RGB16 | RGB16_SNORM | SRGB8 | RGB16F
        | RGB32F | RGB8I | RGB8UI | RGB16I | RGB16UI | RGB32I | RGB32UI => BaseFormat::Rgb,

        RGBA | COMPRESSED_RGBA | COMPRESSED_SRGB_ALPHA | COMPRESSED_RGBA_S3TC_DXT1
        | COMPRESSED_RGBA_S3TC_DXT3 | COMPRESSED_RGBA_S3TC_DXT5 | RGBA2 | RGBA4 | RGB5_A1
        | RGBA8 | RGBA8_SNORM | RGB10_A2 | RGB10_A2UI | RGBA12 | RGBA16 | RGBA16_SNORM
        | SRGB8_ALPHA8 | RGBA16F | RGBA32F | R11F_G11F_B10F | RGBA8I | RGBA8UI | RGBA16I
        | RGBA16UI | RGBA32I | RGBA32UI => BaseFormat::Rgba,

        DEPTH_COMPONENT | DEPTH_COMPONENT16 | DEPTH_COMPONENT24 | DEPTH_COMPONENT32
        | DEPTH_COMPONENT32F => BaseFormat::Depth,

        STENCIL_INDEX => BaseFormat::Stencil,

        DEPTH_STENCIL | DEPTH24_STENCIL8 | DEPTH32F_STENCIL8 => BaseFormat::DepthStencil,

        _ => BaseFormat::Rgba,
    }
}
