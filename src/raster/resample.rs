use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Pixel};

use crate::error::SlideError;

use super::{Raster, Samples};

/// Filter used for all raster resampling.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

impl Raster {
    /// Resample the raster to `width x height`.
    ///
    /// Each channel is resized independently with the triangle (bilinear)
    /// filter. Resizing to the current size returns an exact copy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the sample buffer does not match the
    /// raster geometry.
    pub fn resize(&self, width: u32, height: u32) -> Result<Raster, SlideError> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        if width == 0 || height == 0 || self.is_empty() {
            return Ok(Raster::new(width, height, self.channels, self.data_type()));
        }

        let (w, h, c) = (self.width, self.height, self.channels);
        let samples = match &self.samples {
            Samples::U8(v) => Samples::U8(resize_interleaved(v, w, h, c, width, height)?),
            Samples::U16(v) => Samples::U16(resize_interleaved(v, w, h, c, width, height)?),
            Samples::I16(v) => Samples::I16(resize_interleaved(v, w, h, c, width, height)?),
            Samples::F32(v) => Samples::F32(resize_interleaved(v, w, h, c, width, height)?),
        };
        Raster::from_samples(width, height, self.channels, samples)
    }
}

fn resize_interleaved<T>(
    data: &[T],
    width: u32,
    height: u32,
    channels: usize,
    new_width: u32,
    new_height: u32,
) -> Result<Vec<T>, SlideError>
where
    T: Copy + 'static,
    Luma<T>: Pixel<Subpixel = T>,
{
    let new_pixels = new_width as usize * new_height as usize;
    let mut out = Vec::with_capacity(new_pixels * channels);

    let mut planes = Vec::with_capacity(channels);
    for channel in 0..channels {
        let plane: Vec<T> = data.iter().skip(channel).step_by(channels).copied().collect();
        let buffer: ImageBuffer<Luma<T>, Vec<T>> = ImageBuffer::from_raw(width, height, plane)
            .ok_or_else(|| {
                SlideError::invalid_state(format!(
                    "sample buffer too small for {}x{} plane",
                    width, height
                ))
            })?;
        planes.push(imageops::resize(&buffer, new_width, new_height, RESAMPLE_FILTER).into_raw());
    }

    for pixel in 0..new_pixels {
        out.extend(planes.iter().map(|plane| plane[pixel]));
    }
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
