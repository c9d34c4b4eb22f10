//! Alpha mode detection by bounded texel inspection.

use crate::foundation::error::RenderResult;
use crate::texture::source::{Tile, TileSource};

/// How a texture instance turns texel data into an alpha value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    /// Alpha comes from the texture's fourth channel.
    AlphaChannel,
    /// Alpha is derived from the luminance of the color channels.
    Luminance,
    /// Choose between the two by scanning texel data at frame setup.
    Detect,
}

impl AlphaMode {
    /// Lowercase label matching the parameter vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            AlphaMode::AlphaChannel => "alpha_channel",
            AlphaMode::Luminance => "luminance",
            AlphaMode::Detect => "detect",
        }
    }
}

fn has_transparent_pixels(tile: &Tile) -> bool {
    let stride = tile.channel_count() as usize;
    tile.texels().chunks_exact(stride).any(|px| px[3] < 1.0)
}

/// Decide a concrete alpha mode by inspecting texel data.
///
/// Textures with fewer than four channels cannot carry alpha and resolve to
/// [`AlphaMode::Luminance`] without touching any texel. Otherwise tiles are
/// scanned in row-major order and the first component-3 value strictly below
/// 1.0 settles on [`AlphaMode::AlphaChannel`]; a fully opaque texture falls
/// back to [`AlphaMode::Luminance`].
///
/// At most one tile is resident at a time: each loaded tile is returned to
/// the source before the next is requested and before any early return, so
/// peak memory stays one tile regardless of texture size. A tile that fails
/// to load aborts detection with the source's error.
pub fn detect_alpha_mode(source: &dyn TileSource) -> RenderResult<AlphaMode> {
    let props = source.properties();
    if props.channel_count >= 4 {
        for tile_y in 0..props.tile_count_y() {
            for tile_x in 0..props.tile_count_x() {
                let tile = source.load_tile(tile_x, tile_y)?;
                let transparent = has_transparent_pixels(&tile);
                source.unload_tile(tile_x, tile_y, tile);
                if transparent {
                    return Ok(AlphaMode::AlphaChannel);
                }
            }
        }
    }
    Ok(AlphaMode::Luminance)
}

#[cfg(test)]
#[path = "../../tests/unit/texture/detect.rs"]
mod tests;
