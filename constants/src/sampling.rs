/// Pixel offset from the viewport centre used when sampling the paint
/// colour from a captured frame. Offset so the crosshair glyph itself is
/// not read back.
pub const SAMPLE_PIXEL_OFFSET: (u32, u32) = (5, 5);
