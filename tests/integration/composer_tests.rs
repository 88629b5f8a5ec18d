//! Tile composer integration tests.
//!
//! Tests verify:
//! - Identity, downscaled and upscaled composition over regular grids
//! - Irregular tile layouts compose without gaps
//! - Only tiles intersecting the block are decoded
//! - Absent tiles, caller buffers and error propagation

use slide_compose::error::{DriverError, SlideError};
use slide_compose::geometry::{Rect, Size};
use slide_compose::raster::{DataType, Raster};
use slide_compose::tile::{compose, compose_rect, BufferOwnership};

use super::test_utils::{checkerboard_source, rows, TrackingSource, BACKGROUND};

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_checkerboard_downscale_is_crisp() {
    let mut source = checkerboard_source();
    let block = compose(&mut source, &[], Rect::new(5, 5, 20, 20), Size::new(10, 10), &()).unwrap();

    assert_eq!(block.size(), Size::new(10, 10));
    assert_eq!(block.channels(), 1);
    assert_eq!(block.data_type(), DataType::U8);

    // Tiles map to output bands [0,3), [3,8), [8,10) on both axes.
    let band = |v: u32| match v {
        0..=2 => 0,
        3..=7 => 1,
        _ => 2,
    };
    let expected: Vec<Vec<f64>> = (0..10)
        .map(|y| {
            (0..10)
                .map(|x| if (band(x) + band(y)) % 2 == 1 { 255.0 } else { 0.0 })
                .collect()
        })
        .collect();
    assert_eq!(rows(&block), expected);

    // 3x3 tiles intersect the block; the rest are never decoded.
    assert_eq!(source.reads(), vec![0, 1, 2, 4, 5, 6, 8, 9, 10]);
}

#[test]
fn test_identity_composition() {
    let mut source = TrackingSource::grid(Size::new(25, 17), Size::new(8, 8), 2, |c, r| (c * 10 + r) as u8);
    let block = compose(&mut source, &[], Rect::new(0, 0, 25, 17), Size::new(25, 17), &()).unwrap();

    for y in 0..17u32 {
        for x in 0..25u32 {
            let expected = ((x / 8) * 10 + y / 8) as f64;
            assert_eq!(block.sample(x, y, 0), Some(expected));
            assert_eq!(block.sample(x, y, 1), Some(expected));
        }
    }
    assert_eq!(source.read_count(), 4 * 3);
}

#[test]
fn test_upscale_composition() {
    let mut source = TrackingSource::grid(Size::new(20, 20), Size::new(10, 10), 1, |c, r| (c + 2 * r) as u8 * 50);
    let block = compose(&mut source, &[], Rect::new(0, 0, 20, 20), Size::new(40, 40), &()).unwrap();

    assert_eq!(block.size(), Size::new(40, 40));
    for y in 0..40u32 {
        for x in 0..40u32 {
            let expected = ((x / 20) + 2 * (y / 20)) as f64 * 50.0;
            assert_eq!(block.sample(x, y, 0), Some(expected), "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_irregular_tiles_leave_no_gaps() {
    // Three columns of widths 7, 13, 10 and two rows of heights 9, 11.
    let xs = [(0, 7), (7, 13), (20, 10)];
    let ys = [(0, 9), (9, 11)];
    let mut rects = Vec::new();
    for &(y, h) in &ys {
        for &(x, w) in &xs {
            rects.push(Rect::new(x, y, w, h));
        }
    }
    let values = (0..rects.len()).map(|i| (i * 20) as u8).collect();
    let mut source = TrackingSource::from_rects(rects, values, 1);

    for size in [Size::new(15, 10), Size::new(11, 7), Size::new(30, 20), Size::new(47, 33)] {
        let block = compose(&mut source, &[], Rect::new(0, 0, 30, 20), size, &()).unwrap();
        assert_eq!(block.size(), size);
        for row in rows(&block) {
            assert!(
                row.iter().all(|&v| v != BACKGROUND),
                "gap in {} composition: {:?}",
                size,
                row
            );
        }
    }
}

#[test]
fn test_block_outside_tiles_reads_nothing() {
    let mut source = checkerboard_source();
    let block = compose(&mut source, &[], Rect::new(100, 100, 10, 10), Size::new(5, 5), &()).unwrap();

    assert_eq!(source.read_count(), 0);
    assert!(rows(&block).iter().flatten().all(|&v| v == BACKGROUND));
}

#[test]
fn test_zero_output_size_reads_nothing() {
    let mut source = checkerboard_source();
    let block = compose(&mut source, &[], Rect::new(0, 0, 40, 40), Size::new(0, 0), &()).unwrap();

    assert!(block.is_empty());
    assert_eq!(source.read_count(), 0);
}

#[test]
fn test_source_without_tiles_yields_background() {
    let mut source = TrackingSource::from_rects(Vec::new(), Vec::new(), 3);
    let block = compose(&mut source, &[], Rect::new(0, 0, 8, 8), Size::new(4, 6), &()).unwrap();

    assert_eq!(block.size(), Size::new(4, 6));
    assert_eq!(block.channels(), 3);
    assert_eq!(block.sample(3, 5, 2), Some(BACKGROUND));
}

// =============================================================================
// Absent Tiles and Missing Geometry
// =============================================================================

#[test]
fn test_absent_tile_becomes_background() {
    let mut source = checkerboard_source().with_absent(1);
    let block = compose(&mut source, &[], Rect::new(0, 0, 20, 10), Size::new(20, 10), &()).unwrap();

    assert_eq!(block.sample(5, 5, 0), Some(0.0));
    assert_eq!(block.sample(15, 5, 0), Some(BACKGROUND));
    assert_eq!(source.reads(), vec![0, 1]);
}

#[test]
fn test_missing_tile_geometry_is_invalid_state() {
    let mut source = checkerboard_source().with_rect(1, None);
    match compose(&mut source, &[], Rect::new(0, 0, 40, 40), Size::new(40, 40), &()) {
        Err(SlideError::InvalidState { message }) => assert!(message.contains("tile 1")),
        other => panic!("Expected InvalidState, got {:?}", other),
    }
    assert_eq!(source.reads(), vec![0]);
}

// =============================================================================
// Buffer Ownership
// =============================================================================

#[test]
fn test_caller_buffer_keeps_uncovered_pixels() {
    let mut source = checkerboard_source();
    let mut output = Raster::filled(10, 10, 1, DataType::U8, 7.0);

    compose_rect(
        &mut source,
        &[],
        Rect::new(35, 35, 10, 10),
        Size::new(10, 10),
        &(),
        &mut output,
        BufferOwnership::CallerOwns,
    )
    .unwrap();

    // Tile (3, 3) is black and covers the top-left 5x5 quadrant only.
    assert_eq!(output.sample(0, 0, 0), Some(0.0));
    assert_eq!(output.sample(4, 4, 0), Some(0.0));
    assert_eq!(output.sample(5, 5, 0), Some(7.0));
    assert_eq!(output.sample(9, 0, 0), Some(7.0));
}

#[test]
fn test_caller_buffer_untouched_on_failure() {
    let mut source = checkerboard_source().with_failing(5);
    let mut output = Raster::filled(40, 40, 1, DataType::U8, 1.0);

    let result = compose_rect(
        &mut source,
        &[],
        Rect::new(0, 0, 40, 40),
        Size::new(40, 40),
        &(),
        &mut output,
        BufferOwnership::CallerOwns,
    );
    assert!(matches!(result, Err(SlideError::Driver(DriverError::Decode { .. }))));
    // Tile 1 was composed before tile 5 failed, yet nothing reached the caller.
    assert!(source.reads().contains(&1));
    assert_eq!(output, Raster::filled(40, 40, 1, DataType::U8, 1.0));
}

#[test]
fn test_composer_allocates_replaces_output() {
    let mut source = checkerboard_source();
    let mut output = Raster::filled(3, 3, 4, DataType::U16, 7.0);

    compose_rect(
        &mut source,
        &[],
        Rect::new(0, 0, 10, 10),
        Size::new(10, 10),
        &(),
        &mut output,
        BufferOwnership::ComposerAllocates,
    )
    .unwrap();

    assert_eq!(output.size(), Size::new(10, 10));
    assert_eq!(output.channels(), 1);
    assert_eq!(output.data_type(), DataType::U8);
}

#[test]
fn test_caller_buffer_size_mismatch() {
    let mut source = checkerboard_source();
    let mut output = Raster::new(8, 8, 1, DataType::U8);

    let result = compose_rect(
        &mut source,
        &[],
        Rect::new(0, 0, 10, 10),
        Size::new(10, 10),
        &(),
        &mut output,
        BufferOwnership::CallerOwns,
    );
    match result {
        Err(SlideError::InvalidArgument { .. }) => {}
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
    assert_eq!(source.read_count(), 0);
}

#[test]
fn test_caller_buffer_layout_mismatch() {
    let mut source = checkerboard_source();
    let mut output = Raster::new(10, 10, 3, DataType::U8);

    let result = compose_rect(
        &mut source,
        &[],
        Rect::new(0, 0, 10, 10),
        Size::new(10, 10),
        &(),
        &mut output,
        BufferOwnership::CallerOwns,
    );
    match result {
        Err(SlideError::InvalidState { .. }) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_driver_failure_propagates_unmodified() {
    let mut source = checkerboard_source().with_failing(5);
    let mut output = Raster::filled(4, 4, 1, DataType::U8, 1.0);

    let result = compose_rect(
        &mut source,
        &[],
        Rect::new(0, 0, 40, 40),
        Size::new(4, 4),
        &(),
        &mut output,
        BufferOwnership::ComposerAllocates,
    );
    match result {
        Err(SlideError::Driver(DriverError::Decode { message })) => {
            assert_eq!(message, "corrupt tile 5");
        }
        other => panic!("Expected Driver(Decode), got {:?}", other),
    }
    // No partial output is handed back.
    assert_eq!(output, Raster::filled(4, 4, 1, DataType::U8, 1.0));
}

#[test]
fn test_negative_tile_size_is_invalid_state() {
    let mut source = checkerboard_source().with_rect(0, Some(Rect::new(0, 0, -10, 10)));
    match compose(&mut source, &[], Rect::new(0, 0, 40, 40), Size::new(40, 40), &()) {
        Err(SlideError::InvalidState { .. }) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }
}

#[test]
fn test_invalid_block_arguments() {
    let mut source = checkerboard_source();
    for (rect, size) in [
        (Rect::new(0, 0, 0, 0), Size::new(10, 10)),
        (Rect::new(0, 0, -5, 10), Size::new(10, 10)),
        (Rect::new(0, 0, 10, 10), Size::new(-1, 10)),
    ] {
        match compose(&mut source, &[], rect, size, &()) {
            Err(SlideError::InvalidArgument { .. }) => {}
            other => panic!("Expected InvalidArgument for {} -> {}, got {:?}", rect, size, other),
        }
    }
    assert_eq!(source.read_count(), 0);
}
