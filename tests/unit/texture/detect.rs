use super::*;
use crate::foundation::error::RenderError;
use crate::texture::source::{MemoryTexture, TextureProperties};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tile source wrapper keeping a ledger of load/unload traffic.
struct CountingSource {
    inner: MemoryTexture,
    loads: Mutex<Vec<(u32, u32)>>,
    unloads: Mutex<Vec<(u32, u32)>>,
    resident: AtomicUsize,
    max_resident: AtomicUsize,
    fail_at: Option<(u32, u32)>,
}

impl CountingSource {
    fn new(inner: MemoryTexture) -> Self {
        Self {
            inner,
            loads: Mutex::new(Vec::new()),
            unloads: Mutex::new(Vec::new()),
            resident: AtomicUsize::new(0),
            max_resident: AtomicUsize::new(0),
            fail_at: None,
        }
    }

    fn failing_at(inner: MemoryTexture, tile_x: u32, tile_y: u32) -> Self {
        Self {
            fail_at: Some((tile_x, tile_y)),
            ..Self::new(inner)
        }
    }

    fn load_order(&self) -> Vec<(u32, u32)> {
        self.loads.lock().unwrap().clone()
    }

    fn load_count(&self) -> usize {
        self.loads.lock().unwrap().len()
    }

    fn unload_count(&self) -> usize {
        self.unloads.lock().unwrap().len()
    }
}

impl TileSource for CountingSource {
    fn properties(&self) -> TextureProperties {
        self.inner.properties()
    }

    fn load_tile(&self, tile_x: u32, tile_y: u32) -> RenderResult<Tile> {
        if self.fail_at == Some((tile_x, tile_y)) {
            return Err(RenderError::acquisition("tile backend unavailable"));
        }
        self.loads.lock().unwrap().push((tile_x, tile_y));
        let now = self.resident.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_resident.fetch_max(now, Ordering::SeqCst);
        self.inner.load_tile(tile_x, tile_y)
    }

    fn unload_tile(&self, tile_x: u32, tile_y: u32, _tile: Tile) {
        self.unloads.lock().unwrap().push((tile_x, tile_y));
        self.resident.fetch_sub(1, Ordering::SeqCst);
    }
}

fn opaque_rgba(width: u32, height: u32, tile: u32) -> MemoryTexture {
    MemoryTexture::solid(width, height, tile, tile, &[0.5, 0.5, 0.5, 1.0]).unwrap()
}

#[test]
fn three_channel_textures_never_scan() {
    let source = CountingSource::new(
        MemoryTexture::solid(8, 8, 4, 4, &[0.0, 0.0, 0.0]).unwrap(),
    );
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::Luminance);
    assert_eq!(source.load_count(), 0);
}

#[test]
fn fully_opaque_texture_resolves_to_luminance() {
    let source = CountingSource::new(opaque_rgba(8, 8, 4));
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::Luminance);
    assert_eq!(source.load_count(), 4);
    assert_eq!(source.unload_count(), 4);
}

#[test]
fn single_transparent_pixel_selects_alpha_channel() {
    let mut tex = opaque_rgba(4, 4, 4);
    tex.set_component(2, 1, 3, 0.3);
    let source = CountingSource::new(tex);
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::AlphaChannel);
    // Single tile, so exactly one load/unload pair.
    assert_eq!(source.load_count(), 1);
    assert_eq!(source.unload_count(), 1);
}

#[test]
fn detection_short_circuits_on_first_transparency() {
    let mut tex = opaque_rgba(8, 8, 4);
    // Transparent pixel in tile (1, 0); tiles (0, 1) and (1, 1) must never load.
    tex.set_component(6, 2, 3, 0.0);
    let source = CountingSource::new(tex);
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::AlphaChannel);
    assert_eq!(source.load_order(), vec![(0, 0), (1, 0)]);
    assert_eq!(source.unload_count(), 2);
}

#[test]
fn transparency_in_the_last_clipped_tile_is_still_found() {
    // 5x5 with 4x4 tiles: the last tile of the scan is a clipped 1x1.
    let mut tex = opaque_rgba(5, 5, 4);
    tex.set_component(4, 4, 3, 0.3);
    let source = CountingSource::new(tex);
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::AlphaChannel);
    assert_eq!(source.load_count(), 4);
    // Every scanned tile was returned, including the earlier opaque ones.
    assert_eq!(source.unload_count(), 4);
}

#[test]
fn tiles_are_scanned_row_major() {
    let mut tex = opaque_rgba(8, 8, 4);
    // Transparent pixel in tile (0, 1), the first tile of the second row.
    tex.set_component(1, 5, 3, 0.5);
    let source = CountingSource::new(tex);
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::AlphaChannel);
    assert_eq!(source.load_order(), vec![(0, 0), (1, 0), (0, 1)]);
}

#[test]
fn at_most_one_tile_is_resident() {
    let source = CountingSource::new(opaque_rgba(16, 16, 4));
    detect_alpha_mode(&source).unwrap();
    assert_eq!(source.load_count(), 16);
    assert_eq!(source.max_resident.load(Ordering::SeqCst), 1);
    assert_eq!(source.resident.load(Ordering::SeqCst), 0);
}

#[test]
fn only_strictly_transparent_alpha_counts() {
    // Full opacity everywhere stays luminance.
    let source = CountingSource::new(opaque_rgba(4, 4, 4));
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::Luminance);

    // Any value strictly below 1.0 flips the result.
    let mut tex = opaque_rgba(4, 4, 4);
    tex.set_component(0, 0, 3, 0.9999);
    let source = CountingSource::new(tex);
    assert_eq!(detect_alpha_mode(&source).unwrap(), AlphaMode::AlphaChannel);
}

#[test]
fn load_failure_propagates() {
    let source = CountingSource::failing_at(opaque_rgba(8, 8, 4), 1, 0);
    let err = detect_alpha_mode(&source).unwrap_err();
    assert!(matches!(err, RenderError::ResourceAcquisition(_)));
    // The tile scanned before the failure was returned cleanly.
    assert_eq!(source.load_count(), 1);
    assert_eq!(source.unload_count(), 1);
}
