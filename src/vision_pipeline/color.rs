//! RGB565 / RGB888 color conversion
//!
//! The raster holds RGB565 samples in wire order (big-endian relative to the
//! host), so every read goes through [`from_wire`] before channel extraction.

/// Restores a raster sample to host-order RGB565.
#[inline]
pub fn from_wire(raw: u16) -> u16 {
    (raw >> 8) | (raw << 8)
}

/// Puts a host-order RGB565 value into wire order.
#[inline]
pub fn to_wire(color: u16) -> u16 {
    (color >> 8) | (color << 8)
}

/// Expands an RGB565 value into 8-bit channels.
///
/// Channels keep their most significant bits; the low bits are zero, so pure
/// white maps to `[0xF8, 0xFC, 0xF8]`.
#[inline]
pub fn rgb565_to_rgb888(color: u16) -> [u8; 3] {
    let r = ((color & 0xF800) >> 8) as u8;
    let g = ((color & 0x07E0) >> 3) as u8;
    let b = ((color & 0x001F) << 3) as u8;
    [r, g, b]
}

/// Packs 8-bit channels down to RGB565.
#[inline]
pub fn rgb888_to_rgb565([r, g, b]: [u8; 3]) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Packs RGB888 channels into the single 0xRRGGBB scalar the classifier consumes.
#[inline]
pub fn pack_rgb888([r, g, b]: [u8; 3]) -> f32 {
    (((r as u32) << 16) + ((g as u32) << 8) + b as u32) as f32
}

/// Converts one raw raster sample into a classifier input element.
#[inline]
pub fn wire_to_sample(raw: u16) -> f32 {
    pack_rgb888(rgb565_to_rgb888(from_wire(raw)))
}
