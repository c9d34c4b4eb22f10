use super::*;

fn props(width: u32, height: u32, tile: u32, channels: u32) -> TextureProperties {
    TextureProperties {
        width,
        height,
        tile_width: tile,
        tile_height: tile,
        channel_count: channels,
    }
}

#[test]
fn tile_grid_covers_non_dividing_sizes() {
    let p = props(5, 3, 4, 4);
    assert_eq!(p.tile_count_x(), 2);
    assert_eq!(p.tile_count_y(), 1);
    assert_eq!(p.tile_dimensions(0, 0), (4, 3));
    assert_eq!(p.tile_dimensions(1, 0), (1, 3));
}

#[test]
fn memory_texture_serves_row_major_tiles() {
    // 4x4 single-channel ramp: texel value = y * 4 + x.
    let texels: Vec<f32> = (0..16).map(|v| v as f32).collect();
    let tex = MemoryTexture::new(props(4, 4, 2, 1), texels).unwrap();

    let tile = tex.load_tile(1, 1).unwrap();
    assert_eq!(tile.width(), 2);
    assert_eq!(tile.height(), 2);
    assert_eq!(tile.texels(), &[10.0, 11.0, 14.0, 15.0]);
    assert_eq!(tile.component(0, 1, 0), 14.0);
}

#[test]
fn edge_tiles_are_clipped() {
    let texels = vec![0.5; 5 * 3 * 2];
    let tex = MemoryTexture::new(props(5, 3, 4, 2), texels).unwrap();
    let tile = tex.load_tile(1, 0).unwrap();
    assert_eq!((tile.width(), tile.height()), (1, 3));
    assert_eq!(tile.texels().len(), 6);
}

#[test]
fn out_of_range_tile_dimensions_are_empty() {
    let p = props(5, 3, 4, 4);
    assert_eq!(p.tile_dimensions(2, 0), (0, 3));
    assert_eq!(p.tile_dimensions(0, 1), (4, 0));
    assert_eq!(p.tile_dimensions(u32::MAX, u32::MAX), (0, 0));
}

#[test]
fn oversized_buffer_lengths_do_not_wrap() {
    // 65536 * 65536 * 4 components exceeds u32; the length check must not
    // wrap around and accept an empty buffer.
    assert!(matches!(
        Tile::from_texels(65_536, 65_536, 4, Vec::new()),
        Err(RenderError::Validation(_))
    ));
    assert!(matches!(
        MemoryTexture::new(props(65_536, 65_536, 64, 4), Vec::new()),
        Err(RenderError::Validation(_))
    ));
}

#[test]
fn buffer_length_is_validated() {
    assert!(matches!(
        MemoryTexture::new(props(4, 4, 2, 3), vec![0.0; 7]),
        Err(RenderError::Validation(_))
    ));
    assert!(matches!(
        Tile::from_texels(2, 2, 3, vec![0.0; 5]),
        Err(RenderError::Validation(_))
    ));
}

#[test]
fn out_of_range_tile_is_rejected() {
    let tex = MemoryTexture::solid(4, 4, 2, 2, &[1.0]).unwrap();
    assert!(tex.load_tile(2, 0).is_err());
    assert!(tex.load_tile(0, 2).is_err());
}

#[test]
fn solid_fills_every_pixel() {
    let tex = MemoryTexture::solid(3, 2, 2, 2, &[0.1, 0.2, 0.3, 1.0]).unwrap();
    assert_eq!(tex.properties().channel_count, 4);
    let tile = tex.load_tile(1, 0).unwrap();
    assert_eq!(tile.component(0, 1, 3), 1.0);
    assert_eq!(tile.component(0, 0, 1), 0.2);
}

#[test]
fn from_image_keeps_the_source_channel_layout() {
    let rgb = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        3,
        2,
        image::Rgb([255, 128, 0]),
    ));
    let tex = MemoryTexture::from_image(&rgb, 2, 2).unwrap();
    assert_eq!(tex.properties().channel_count, 3);
    assert_eq!(tex.properties().width, 3);

    let rgba = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        2,
        image::Rgba([255, 128, 0, 64]),
    ));
    let tex = MemoryTexture::from_image(&rgba, 2, 2).unwrap();
    assert_eq!(tex.properties().channel_count, 4);
    let tile = tex.load_tile(0, 0).unwrap();
    // 8-bit 64 maps into (0, 1) strictly below full opacity.
    assert!(tile.component(0, 0, 3) < 1.0);
    assert!(tile.component(0, 0, 3) > 0.0);
}

#[test]
fn set_component_edits_the_backing_buffer() {
    let mut tex = MemoryTexture::solid(2, 2, 2, 2, &[0.0, 0.0, 0.0, 1.0]).unwrap();
    tex.set_component(1, 1, 3, 0.25);
    let tile = tex.load_tile(0, 0).unwrap();
    assert_eq!(tile.component(1, 1, 3), 0.25);
    assert_eq!(tile.component(0, 0, 3), 1.0);
}
