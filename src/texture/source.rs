use crate::foundation::error::{RenderError, RenderResult};

// Index math stays in usize so component counts past u32::MAX cannot wrap.
fn texel_index(width: u32, channel_count: u32, x: u32, y: u32, c: u32) -> usize {
    (y as usize * width as usize + x as usize) * channel_count as usize + c as usize
}

/// Pixel layout of a tiled texture.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextureProperties {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Nominal tile width; edge tiles may be narrower.
    pub tile_width: u32,
    /// Nominal tile height; edge tiles may be shorter.
    pub tile_height: u32,
    /// Interleaved components per pixel.
    pub channel_count: u32,
}

impl TextureProperties {
    /// Number of tile columns.
    pub fn tile_count_x(&self) -> u32 {
        self.width.div_ceil(self.tile_width)
    }

    /// Number of tile rows.
    pub fn tile_count_y(&self) -> u32 {
        self.height.div_ceil(self.tile_height)
    }

    /// Actual dimensions of the tile at `(tile_x, tile_y)`, clipped to the
    /// image bounds. Coordinates beyond the grid yield zero-sized axes.
    pub fn tile_dimensions(&self, tile_x: u32, tile_y: u32) -> (u32, u32) {
        let w = self
            .tile_width
            .min(self.width.saturating_sub(tile_x.saturating_mul(self.tile_width)));
        let h = self
            .tile_height
            .min(self.height.saturating_sub(tile_y.saturating_mul(self.tile_height)));
        (w, h)
    }
}

/// One decoded tile of texel data, components interleaved row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    width: u32,
    height: u32,
    channel_count: u32,
    texels: Vec<f32>,
}

impl Tile {
    /// A zero-filled tile.
    pub fn new(width: u32, height: u32, channel_count: u32) -> Self {
        Self {
            width,
            height,
            channel_count,
            texels: vec![0.0; width as usize * height as usize * channel_count as usize],
        }
    }

    /// Wrap an existing texel buffer; its length must match the dimensions.
    pub fn from_texels(width: u32, height: u32, channel_count: u32, texels: Vec<f32>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * channel_count as usize;
        if texels.len() != expected {
            return Err(RenderError::validation(format!(
                "tile buffer holds {} components, expected {expected} for {width}x{height}x{channel_count}",
                texels.len()
            )));
        }
        Ok(Self { width, height, channel_count, texels })
    }

    /// Tile width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved components per pixel.
    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Read one component of the pixel at `(x, y)`.
    pub fn component(&self, x: u32, y: u32, c: u32) -> f32 {
        self.texels[texel_index(self.width, self.channel_count, x, y, c)]
    }

    /// Write one component of the pixel at `(x, y)`.
    pub fn set_component(&mut self, x: u32, y: u32, c: u32, value: f32) {
        self.texels[texel_index(self.width, self.channel_count, x, y, c)] = value;
    }

    /// The raw texel buffer.
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }
}

/// Streaming access to tiled texture data.
///
/// Consumers hold at most one tile at a time: every successful
/// [`TileSource::load_tile`] is paired with an [`TileSource::unload_tile`]
/// passing the tile back, which lets caching or disk-backed sources account
/// residency exactly. The tile moves through the pair, so a forgotten unload
/// is at worst a leak of one tile, never a double release.
pub trait TileSource: Send + Sync {
    /// Pixel layout served by this source.
    fn properties(&self) -> TextureProperties;

    /// Produce the tile at `(tile_x, tile_y)`.
    ///
    /// Failures are resource acquisition errors, fatal to the entity that
    /// requested the tile but not to the frame as a whole.
    fn load_tile(&self, tile_x: u32, tile_y: u32) -> RenderResult<Tile>;

    /// Return a tile obtained from [`TileSource::load_tile`].
    ///
    /// The default implementation drops it, which suits fully in-memory
    /// sources.
    fn unload_tile(&self, tile_x: u32, tile_y: u32, tile: Tile) {
        let _ = (tile_x, tile_y, tile);
    }
}

/// Tiled texture fully resident in memory.
///
/// Serves tiles by copying the requested window out of one flat, row-major
/// texel buffer.
#[derive(Clone, Debug)]
pub struct MemoryTexture {
    props: TextureProperties,
    texels: Vec<f32>,
}

impl MemoryTexture {
    /// Wrap a flat texel buffer; its length must match `props`.
    pub fn new(props: TextureProperties, texels: Vec<f32>) -> RenderResult<Self> {
        if props.tile_width == 0 || props.tile_height == 0 || props.channel_count == 0 {
            return Err(RenderError::validation("texture tile dimensions and channel count must be nonzero"));
        }
        let expected = props.width as usize * props.height as usize * props.channel_count as usize;
        if texels.len() != expected {
            return Err(RenderError::validation(format!(
                "texel buffer holds {} components, expected {expected} for {}x{}x{}",
                texels.len(),
                props.width,
                props.height,
                props.channel_count
            )));
        }
        Ok(Self { props, texels })
    }

    /// Build from a decoded image, splitting it into tiles of the given size.
    ///
    /// Images without an alpha channel are kept at three components so that
    /// downstream channel-count checks see the original layout.
    pub fn from_image(image: &image::DynamicImage, tile_width: u32, tile_height: u32) -> RenderResult<Self> {
        let (width, height) = (image.width(), image.height());
        let (channel_count, texels) = if image.color().has_alpha() {
            (4, image.to_rgba32f().into_raw())
        } else {
            (3, image.to_rgb32f().into_raw())
        };
        Self::new(
            TextureProperties {
                width,
                height,
                tile_width,
                tile_height,
                channel_count,
            },
            texels,
        )
    }

    /// A texture where every pixel holds `components`.
    pub fn solid(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        components: &[f32],
    ) -> RenderResult<Self> {
        let mut texels = Vec::with_capacity(width as usize * height as usize * components.len());
        for _ in 0..width as usize * height as usize {
            texels.extend_from_slice(components);
        }
        Self::new(
            TextureProperties {
                width,
                height,
                tile_width,
                tile_height,
                channel_count: components.len() as u32,
            },
            texels,
        )
    }

    /// Write one component of the pixel at image coordinates `(x, y)`.
    pub fn set_component(&mut self, x: u32, y: u32, c: u32, value: f32) {
        self.texels[texel_index(self.props.width, self.props.channel_count, x, y, c)] = value;
    }
}

impl TileSource for MemoryTexture {
    fn properties(&self) -> TextureProperties {
        self.props
    }

    fn load_tile(&self, tile_x: u32, tile_y: u32) -> RenderResult<Tile> {
        if tile_x >= self.props.tile_count_x() || tile_y >= self.props.tile_count_y() {
            return Err(RenderError::validation(format!(
                "tile ({tile_x}, {tile_y}) out of range for a {}x{} tile grid",
                self.props.tile_count_x(),
                self.props.tile_count_y()
            )));
        }
        let (tw, th) = self.props.tile_dimensions(tile_x, tile_y);
        let channels = self.props.channel_count;
        let x0 = tile_x * self.props.tile_width;
        let y0 = tile_y * self.props.tile_height;
        let mut texels = Vec::with_capacity(tw as usize * th as usize * channels as usize);
        for row in 0..th {
            let start = texel_index(self.props.width, channels, x0, y0 + row, 0);
            let end = start + tw as usize * channels as usize;
            texels.extend_from_slice(&self.texels[start..end]);
        }
        Tile::from_texels(tw, th, channels, texels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/source.rs"]
mod tests;
