//! Scene read integration tests against the image driver.
//!
//! Tests verify:
//! - Full-resolution reads reproduce the source pixels exactly
//! - Resampled reads pick a pyramid level and produce the requested size
//! - Channel selection, reordering and duplication
//! - 4D reads on 2D scenes
//! - 16-bit images keep their sample type

use image::{DynamicImage, ImageBuffer, Luma};

use slide_compose::error::SlideError;
use slide_compose::format::ImageDriver;
use slide_compose::geometry::{Range, Rect, Size};
use slide_compose::raster::{DataType, Raster};
use slide_compose::slide::{BlockRequest, DriverRegistry, Scene, SlideSummary};

use super::test_utils::{rgb_pattern, write_gray_png, write_png, write_rgb_png};

fn pattern_raster(width: u32, height: u32) -> Raster {
    Raster::from_dynamic_image(DynamicImage::ImageRgb8(rgb_pattern(width, height)))
}

#[test]
fn test_read_block_is_exact() {
    let path = write_rgb_png("exact", 300, 200);
    let mut slide = ImageDriver::with_options(64, 1 << 20).open(&path).unwrap();
    let scene = slide.scene_mut_image();

    let rect = Rect::new(37, 21, 150, 90);
    let block = scene.read_block(rect).unwrap();

    assert_eq!(block, pattern_raster(300, 200).crop(rect).unwrap());
}

#[test]
fn test_scene_metadata() {
    let path = write_rgb_png("metadata", 600, 300);
    let registry = DriverRegistry::with_default_drivers();
    let slide = registry.open_slide(&path, "").unwrap();

    assert_eq!(slide.num_scenes(), 1);
    let scene = slide.scene(0).unwrap();
    assert_eq!(scene.rect(), Rect::new(0, 0, 600, 300));
    assert_eq!(scene.num_channels(), 3);
    assert_eq!(scene.channel_data_type(2), Some(DataType::U8));
    assert_eq!(scene.channel_data_type(3), None);
    assert_eq!(scene.num_z_slices(), 1);
    assert_eq!(scene.num_t_frames(), 1);

    // 600x300 -> 300x150 -> 150x75 fits a 256 tile.
    let sizes: Vec<Size> = scene.levels().iter().map(|l| l.size).collect();
    assert_eq!(sizes, vec![Size::new(600, 300), Size::new(300, 150), Size::new(150, 75)]);
}

#[test]
fn test_summary_serializes() {
    let path = write_gray_png("summary", 40, 30, 5);
    let registry = DriverRegistry::with_default_drivers();
    let slide = registry.open_slide(&path, "IMAGE").unwrap();

    let summary = SlideSummary::from_slide(slide.as_ref());
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["scenes"][0]["channels"], 1);
    assert_eq!(json["scenes"][0]["rect"]["width"], 40);
    assert_eq!(json["scenes"][0]["data_types"][0], "U8");
    assert_eq!(json["scenes"][0]["compression"], "Png");
    assert_eq!(json["scenes"][0]["z_slice_resolution"], 0.0);
    assert!(json["scenes"][0]["aux_images"].as_array().unwrap().is_empty());
    assert_eq!(json["scenes"][0]["levels"].as_array().unwrap().len(), 1);
}

#[test]
fn test_resampled_read_size_and_content() {
    let path = write_gray_png("flat", 800, 600, 120);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();
    let rect = scene.rect();

    for size in [Size::new(100, 75), Size::new(333, 250), Size::new(1600, 1200)] {
        let block = scene.read_resampled_block(rect, size).unwrap();
        assert_eq!(block.size(), size);
        assert_eq!(block.sample(0, 0, 0), Some(120.0));
        assert_eq!(
            block.sample(size.width as u32 - 1, size.height as u32 - 1, 0),
            Some(120.0)
        );
    }
}

#[test]
fn test_downscale_matches_pyramid_level() {
    let path = write_rgb_png("level", 512, 512);
    let mut slide = ImageDriver::with_options(128, 1 << 20).open(&path).unwrap();
    let scene = slide.scene_mut_image();

    let half = scene
        .read_resampled_block(Rect::new(0, 0, 512, 512), Size::new(256, 256))
        .unwrap();
    let expected = pattern_raster(512, 512).resize(256, 256).unwrap();
    assert_eq!(half, expected);
}

#[test]
fn test_channel_selection() {
    let path = write_rgb_png("channels", 64, 64);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();
    let rect = Rect::new(10, 20, 16, 16);

    let bgr = scene.read_block_channels(rect, &[2, 1, 0]).unwrap();
    let rr = scene.read_block_channels(rect, &[0, 0]).unwrap();
    let green = scene.read_block_channels(rect, &[1]).unwrap();

    assert_eq!(bgr.channels(), 3);
    assert_eq!(rr.channels(), 2);
    assert_eq!(green.channels(), 1);
    for (x, y) in [(0u32, 0u32), (5, 9), (15, 15)] {
        let (sx, sy) = (x + 10, y + 20);
        assert_eq!(bgr.sample(x, y, 0), Some(((sx + sy) % 256) as f64));
        assert_eq!(bgr.sample(x, y, 2), Some(sx as f64));
        assert_eq!(rr.sample(x, y, 0), Some(sx as f64));
        assert_eq!(rr.sample(x, y, 1), Some(sx as f64));
        assert_eq!(green.sample(x, y, 0), Some(sy as f64));
    }
}

#[test]
fn test_invalid_channel_index() {
    let path = write_rgb_png("bad_channel", 16, 16);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();

    match scene.read_block_channels(Rect::new(0, 0, 4, 4), &[0, 3]) {
        Err(SlideError::InvalidArgument { .. }) => {}
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_read_past_scene_edge_is_background() {
    let path = write_gray_png("edge", 50, 50, 200);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();

    let block = scene.read_block(Rect::new(40, 40, 20, 20)).unwrap();
    assert_eq!(block.sample(9, 9, 0), Some(200.0));
    assert_eq!(block.sample(10, 10, 0), Some(0.0));
    assert_eq!(block.sample(19, 0, 0), Some(0.0));
}

#[test]
fn test_4d_reads_on_2d_scene() {
    let path = write_gray_png("flat4d", 32, 32, 9);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();
    let rect = Rect::new(0, 0, 32, 32);

    let block = scene
        .read_resampled_4d_block(rect, Size::new(8, 8), Range::default(), Range::default())
        .unwrap();
    assert_eq!(block.len(), 1);
    assert_eq!(block.plane(0, 0).unwrap().size(), Size::new(8, 8));

    match scene.read_4d_block(rect, Range::new(0, 2), Range::default()) {
        Err(SlideError::UnsupportedOperation { .. }) => {}
        other => panic!("Expected UnsupportedOperation, got {:?}", other),
    }
}

#[test]
fn test_block_request() {
    let path = write_rgb_png("request", 128, 128);
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();

    let request = BlockRequest::new(Rect::new(0, 0, 128, 128))
        .size(Size::new(32, 32))
        .channels(&[2]);
    let block = scene.read(&request).unwrap();
    let plane = block.plane(0, 0).unwrap();

    assert_eq!(plane.size(), Size::new(32, 32));
    assert_eq!(plane.channels(), 1);
}

#[test]
fn test_sixteen_bit_image() {
    let image = ImageBuffer::<Luma<u16>, _>::from_fn(40, 40, |x, y| Luma([(x * 1000 + y) as u16]));
    let path = write_png("deep", DynamicImage::ImageLuma16(image));
    let registry = DriverRegistry::with_default_drivers();
    let mut slide = registry.open_slide(&path, "").unwrap();
    let scene = slide.scene_mut(0).unwrap();

    assert_eq!(scene.channel_data_type(0), Some(DataType::U16));
    let block = scene.read_block(Rect::new(30, 5, 10, 10)).unwrap();
    assert_eq!(block.data_type(), DataType::U16);
    assert_eq!(block.sample(9, 9, 0), Some(39_014.0));
}

/// Direct access to the single scene of an image slide.
trait ImageSlideExt {
    fn scene_mut_image(&mut self) -> &mut dyn Scene;
}

impl ImageSlideExt for slide_compose::format::ImageSlide {
    fn scene_mut_image(&mut self) -> &mut dyn Scene {
        use slide_compose::slide::Slide;
        self.scene_mut(0).unwrap()
    }
}
