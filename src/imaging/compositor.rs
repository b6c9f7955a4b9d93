/// Multi-image composition
///
/// Turns an ordered list of up to four rasters into a single raster sized
/// for a target canvas:
/// - 1 image: fitted inside the canvas, aspect ratio kept
/// - 2 or 3 images: a left-to-right strip at a common height, shrunk as a
///   whole when wider than the canvas, then fitted inside it
/// - 4 images: a 2x2 grid filling the canvas exactly, each image fitted into
///   its own cell and anchored at the cell's top-left corner
///
/// Composition is pure: same rasters, same order, same target, same bytes.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::raster::{CanvasSize, Raster};

/// Largest number of rasters a single composition accepts
pub const MAX_COMPOSED: usize = 4;

/// Resampling filter for every scale step
const FILTER: FilterType = FilterType::Lanczos3;

/// Compose `rasters` for a canvas of `target` size
///
/// Null rasters are skipped. The layout is chosen from the length of the
/// list as given, so a failed decode in a 2x2 grid leaves its cell empty
/// instead of reflowing the other images.
pub fn compose(rasters: &[Raster], target: CanvasSize) -> Raster {
    if target.is_degenerate() {
        return Raster::null();
    }

    let present: Vec<&Raster> = rasters.iter().filter(|r| !r.is_null()).collect();
    if present.is_empty() {
        return Raster::null();
    }

    match rasters.len() {
        1 => resample(present[0], fit_within(present[0].size(), target)),
        2 | 3 => compose_strip(&present, target),
        4 => compose_grid(rasters, target),
        count => {
            tracing::warn!("Refusing to compose {} images (max {})", count, MAX_COMPOSED);
            Raster::null()
        }
    }
}

/// Largest size with `src`'s aspect ratio that fits inside `bounds`
///
/// Integer arithmetic: the full bounds height is used when the matching width
/// fits, otherwise the full bounds width. May scale up.
pub fn fit_within(src: CanvasSize, bounds: CanvasSize) -> CanvasSize {
    if src.is_degenerate() || bounds.is_degenerate() {
        return CanvasSize::default();
    }

    let (src_w, src_h) = (src.width as u64, src.height as u64);
    let (max_w, max_h) = (bounds.width as u64, bounds.height as u64);

    let width_at_full_height = max_h * src_w / src_h;
    if width_at_full_height <= max_w {
        CanvasSize::new(width_at_full_height as u32, bounds.height)
    } else {
        CanvasSize::new(bounds.width, (max_w * src_h / src_w) as u32)
    }
}

/// Size of `src` scaled to `height`, width rounded to nearest
pub fn scale_to_height(src: CanvasSize, height: u32) -> CanvasSize {
    if src.is_degenerate() || height == 0 {
        return CanvasSize::default();
    }
    let (src_w, src_h, h) = (src.width as u64, src.height as u64, height as u64);
    let width = (2 * src_w * h + src_h) / (2 * src_h);
    CanvasSize::new(width as u32, height)
}

/// Resample `raster` to exactly `size`
fn resample(raster: &Raster, size: CanvasSize) -> Raster {
    if size.is_degenerate() || raster.is_null() {
        return Raster::null();
    }
    if raster.size() == size {
        return raster.clone();
    }
    imageops::resize(raster.image(), size.width, size.height, FILTER).into()
}

fn compose_strip(present: &[&Raster], target: CanvasSize) -> Raster {
    // Common height first; tiles that collapse to nothing drop out
    let scaled: Vec<(&Raster, CanvasSize)> = present
        .iter()
        .map(|r| (*r, scale_to_height(r.size(), target.height)))
        .filter(|(_, size)| !size.is_degenerate())
        .collect();

    let total_width: u64 = scaled.iter().map(|(_, size)| size.width as u64).sum();
    let max_width = target.width as u64;

    // One factor for every tile and both axes, so each source is resampled once
    let tiles: Vec<Raster> = scaled
        .into_iter()
        .map(|(raster, size)| {
            let size = if total_width > max_width {
                CanvasSize::new(
                    (size.width as u64 * max_width / total_width) as u32,
                    (size.height as u64 * max_width / total_width) as u32,
                )
            } else {
                size
            };
            resample(raster, size)
        })
        .filter(|t| !t.is_null())
        .collect();

    let strip_width: u32 = tiles.iter().map(Raster::width).sum();
    let strip_height = tiles.iter().map(Raster::height).max().unwrap_or(0);
    if strip_width == 0 || strip_height == 0 {
        return Raster::null();
    }

    let mut strip = RgbaImage::new(strip_width, strip_height);
    let mut x_offset: i64 = 0;
    for tile in &tiles {
        imageops::replace(&mut strip, tile.image(), x_offset, 0);
        x_offset += tile.width() as i64;
    }

    let strip = Raster::from(strip);
    resample(&strip, fit_within(strip.size(), target))
}

fn compose_grid(rasters: &[Raster], target: CanvasSize) -> Raster {
    let cell = CanvasSize::new(target.width / 2, target.height / 2);
    let mut canvas = RgbaImage::new(target.width, target.height);

    for (slot, raster) in rasters.iter().enumerate() {
        let tile = resample(raster, fit_within(raster.size(), cell));
        if tile.is_null() {
            continue;
        }
        let (x, y) = slot_origin(slot, cell);
        imageops::replace(&mut canvas, tile.image(), x, y);
    }

    canvas.into()
}

/// Top-left corner of a grid slot, reading order
fn slot_origin(slot: usize, cell: CanvasSize) -> (i64, i64) {
    let column = (slot % 2) as i64;
    let row = (slot / 2) as i64;
    (column * cell.width as i64, row * cell.height as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> Raster {
        RgbaImage::from_pixel(width, height, color).into()
    }

    fn alpha_at(raster: &Raster, x: u32, y: u32) -> u8 {
        raster.image().get_pixel(x, y)[3]
    }

    #[test]
    fn test_fit_within() {
        // Wide source limited by width
        assert_eq!(
            fit_within(CanvasSize::new(200, 100), CanvasSize::new(300, 300)),
            CanvasSize::new(300, 150)
        );
        // Tall source limited by height
        assert_eq!(
            fit_within(CanvasSize::new(100, 400), CanvasSize::new(300, 300)),
            CanvasSize::new(75, 300)
        );
        // Exact match keeps the size
        assert_eq!(
            fit_within(CanvasSize::new(300, 100), CanvasSize::new(300, 150)),
            CanvasSize::new(300, 100)
        );
        assert!(fit_within(CanvasSize::new(0, 10), CanvasSize::new(10, 10)).is_degenerate());
    }

    #[test]
    fn test_scale_to_height() {
        assert_eq!(
            scale_to_height(CanvasSize::new(200, 100), 150),
            CanvasSize::new(300, 150)
        );
        assert_eq!(
            scale_to_height(CanvasSize::new(100, 100), 150),
            CanvasSize::new(150, 150)
        );
        // 3 * 10 / 7 = 4.28 rounds down
        assert_eq!(scale_to_height(CanvasSize::new(3, 7), 10).width, 4);
    }

    #[test]
    fn test_empty_and_all_null() {
        let target = CanvasSize::new(100, 100);
        assert!(compose(&[], target).is_null());
        assert!(compose(&[Raster::null(), Raster::null()], target).is_null());
    }

    #[test]
    fn test_degenerate_target() {
        let images = [solid(10, 10, RED)];
        assert!(compose(&images, CanvasSize::new(0, 100)).is_null());
        assert!(compose(&images, CanvasSize::new(100, 0)).is_null());
    }

    #[test]
    fn test_too_many_images() {
        let images: Vec<Raster> = (0..5).map(|_| solid(10, 10, RED)).collect();
        assert!(compose(&images, CanvasSize::new(100, 100)).is_null());
    }

    #[test]
    fn test_single_image_keeps_aspect_ratio() {
        let target = CanvasSize::new(300, 300);

        let wide = compose(&[solid(200, 100, RED)], target);
        assert_eq!(wide.size(), CanvasSize::new(300, 150));

        let tall = compose(&[solid(100, 400, RED)], target);
        assert_eq!(tall.size(), CanvasSize::new(75, 300));

        let odd = compose(&[solid(640, 427, RED)], CanvasSize::new(123, 457));
        assert!(odd.width() <= 123 && odd.height() <= 457);
        let src_ratio = 640.0 / 427.0;
        let out_ratio = odd.width() as f64 / odd.height() as f64;
        assert!((src_ratio - out_ratio).abs() < 0.02);
    }

    #[test]
    fn test_strip_shrinks_to_target_width() {
        // 200x100 -> 300x150, 100x100 -> 150x150, 450 wide > 300
        // factor 300/450 -> 200x100 + 100x100
        let a = solid(200, 100, RED);
        let b = solid(100, 100, BLUE);
        let out = compose(&[a, b], CanvasSize::new(300, 150));

        assert_eq!(out.size(), CanvasSize::new(300, 100));
        assert_eq!(*out.image().get_pixel(100, 50), RED);
        assert_eq!(*out.image().get_pixel(250, 50), BLUE);
    }

    #[test]
    fn test_strip_panorama_resampled_once() {
        // 3000x100 + 100x100 at height 100 need 3100 of 400 wide:
        // 387x12 + 12x12, then the 399x12 strip fits to 400x12
        let out = compose(
            &[solid(3000, 100, RED), solid(100, 100, BLUE)],
            CanvasSize::new(400, 100),
        );
        assert_eq!(out.size(), CanvasSize::new(400, 12));
        assert!(out.image().get_pixel(100, 6)[0] > 200);
        assert!(out.image().get_pixel(396, 6)[2] > 200);
    }

    #[test]
    fn test_strip_narrower_than_target() {
        // Two squares at height 100 need 200 of 500 available width
        let out = compose(
            &[solid(50, 50, RED), solid(50, 50, GREEN)],
            CanvasSize::new(500, 100),
        );
        assert_eq!(out.size(), CanvasSize::new(200, 100));
        assert!(out.image().get_pixel(50, 50)[0] > 200);
        assert!(out.image().get_pixel(150, 50)[1] > 200);
    }

    #[test]
    fn test_strip_of_three_keeps_order() {
        let images = [
            solid(100, 100, RED),
            solid(100, 100, GREEN),
            solid(100, 100, BLUE),
        ];
        let out = compose(&images, CanvasSize::new(300, 100));
        assert_eq!(out.size(), CanvasSize::new(300, 100));
        assert_eq!(*out.image().get_pixel(50, 50), RED);
        assert_eq!(*out.image().get_pixel(150, 50), GREEN);
        assert_eq!(*out.image().get_pixel(250, 50), BLUE);
    }

    #[test]
    fn test_strip_skips_failed_decode() {
        let images = [solid(100, 100, RED), Raster::null(), solid(100, 100, BLUE)];
        let out = compose(&images, CanvasSize::new(400, 100));
        assert_eq!(out.size(), CanvasSize::new(200, 100));
        assert_eq!(*out.image().get_pixel(50, 50), RED);
        assert_eq!(*out.image().get_pixel(150, 50), BLUE);
    }

    #[test]
    fn test_grid_fills_target_and_anchors_top_left() {
        // 200x100 fits a 200x200 cell unchanged, leaving the lower half empty
        let images = [
            solid(200, 100, RED),
            solid(200, 100, GREEN),
            solid(200, 100, BLUE),
            solid(200, 100, WHITE),
        ];
        let out = compose(&images, CanvasSize::new(400, 400));

        assert_eq!(out.size(), CanvasSize::new(400, 400));
        assert_eq!(*out.image().get_pixel(10, 10), RED);
        assert_eq!(*out.image().get_pixel(210, 10), GREEN);
        assert_eq!(*out.image().get_pixel(10, 210), BLUE);
        assert_eq!(*out.image().get_pixel(210, 210), WHITE);

        // Leftover cell space stays transparent
        assert_eq!(alpha_at(&out, 10, 150), 0);
        assert_eq!(alpha_at(&out, 210, 350), 0);
    }

    #[test]
    fn test_grid_scales_each_cell_independently() {
        let images = [
            solid(1000, 1000, RED),
            solid(50, 100, GREEN),
            solid(300, 100, BLUE),
            solid(20, 20, WHITE),
        ];
        let out = compose(&images, CanvasSize::new(400, 400));
        assert_eq!(out.size(), CanvasSize::new(400, 400));

        // 50x100 -> 100x200: right part of the top-right cell is empty
        assert!(out.image().get_pixel(250, 100)[1] > 200);
        assert_eq!(alpha_at(&out, 350, 100), 0);

        // 300x100 -> 200x66: bottom-left cell only covers its top rows
        assert!(out.image().get_pixel(100, 230)[2] > 200);
        assert_eq!(alpha_at(&out, 100, 350), 0);

        // 20x20 upscales to fill the whole bottom-right cell
        assert!(alpha_at(&out, 390, 390) > 200);
    }

    #[test]
    fn test_grid_leaves_failed_slot_empty() {
        let images = [
            solid(10, 10, RED),
            Raster::null(),
            solid(10, 10, BLUE),
            solid(10, 10, WHITE),
        ];
        let out = compose(&images, CanvasSize::new(200, 200));
        assert_eq!(out.size(), CanvasSize::new(200, 200));
        assert_eq!(alpha_at(&out, 150, 50), 0);
        assert!(out.image().get_pixel(50, 150)[2] > 200);
        assert!(out.image().get_pixel(150, 150)[0] > 200);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let images = [solid(37, 91, RED), solid(64, 48, GREEN), solid(13, 7, BLUE)];
        let target = CanvasSize::new(211, 97);
        let first = compose(&images, target);
        let second = compose(&images, target);
        assert_eq!(first.size(), second.size());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }
}
