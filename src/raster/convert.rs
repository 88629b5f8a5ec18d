use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

use crate::error::SlideError;

use super::{Raster, Samples};

impl Raster {
    /// Convert a decoded image into a raster.
    ///
    /// 8-bit, 16-bit and 32-bit float layouts keep their sample type and
    /// channel count; any other layout is converted to 8-bit RGBA.
    pub fn from_dynamic_image(image: DynamicImage) -> Raster {
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(b) => (1, Samples::U8(b.into_raw())),
            DynamicImage::ImageLumaA8(b) => (2, Samples::U8(b.into_raw())),
            DynamicImage::ImageRgb8(b) => (3, Samples::U8(b.into_raw())),
            DynamicImage::ImageRgba8(b) => (4, Samples::U8(b.into_raw())),
            DynamicImage::ImageLuma16(b) => (1, Samples::U16(b.into_raw())),
            DynamicImage::ImageLumaA16(b) => (2, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgb16(b) => (3, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgba16(b) => (4, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgb32F(b) => (3, Samples::F32(b.into_raw())),
            DynamicImage::ImageRgba32F(b) => (4, Samples::F32(b.into_raw())),
            other => (4, Samples::U8(other.into_rgba8().into_raw())),
        };
        Raster {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Convert the raster into an encodable image.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for layouts the `image` crate cannot
    /// represent (signed samples, channel counts other than 1-4, 1-2 channel
    /// float images).
    pub fn to_dynamic_image(&self) -> Result<DynamicImage, SlideError> {
        let (w, h) = (self.width, self.height);
        let unsupported = || {
            SlideError::invalid_argument(format!(
                "cannot encode {} raster with {} channels",
                self.data_type().name(),
                self.channels
            ))
        };
        let too_small = || SlideError::invalid_state("sample buffer does not match raster size");

        let image = match (&self.samples, self.channels) {
            (Samples::U8(v), 1) => DynamicImage::ImageLuma8(
                ImageBuffer::<Luma<u8>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U8(v), 2) => DynamicImage::ImageLumaA8(
                ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U8(v), 3) => DynamicImage::ImageRgb8(
                ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U8(v), 4) => DynamicImage::ImageRgba8(
                ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U16(v), 1) => DynamicImage::ImageLuma16(
                ImageBuffer::<Luma<u16>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U16(v), 2) => DynamicImage::ImageLumaA16(
                ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U16(v), 3) => DynamicImage::ImageRgb16(
                ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::U16(v), 4) => DynamicImage::ImageRgba16(
                ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::F32(v), 3) => DynamicImage::ImageRgb32F(
                ImageBuffer::<Rgb<f32>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            (Samples::F32(v), 4) => DynamicImage::ImageRgba32F(
                ImageBuffer::<Rgba<f32>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            _ => return Err(unsupported()),
        };
        Ok(image)
    }
}
