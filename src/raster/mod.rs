//! Typed pixel buffers.
//!
//! A [`Raster`] is a `width x height` block of interleaved, row-major samples
//! with a fixed [`DataType`] and channel count. Rasters are what tile sources
//! return and what the composer writes into.
//!
//! Resampling ([`Raster::resize`]) delegates to the `image` crate's triangle
//! (bilinear) filter, one channel plane at a time, so any channel count is
//! supported and results are deterministic.

mod convert;
mod resample;

use serde::Serialize;

use crate::error::SlideError;
use crate::geometry::{Rect, Size};

// =============================================================================
// DataType
// =============================================================================

/// Element type of raster samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    U8,
    U16,
    I16,
    F32,
}

impl DataType {
    /// Size of one sample in bytes.
    pub const fn size(&self) -> usize {
        match self {
            DataType::U8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::F32 => 4,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            DataType::U8 => "uint8",
            DataType::U16 => "uint16",
            DataType::I16 => "int16",
            DataType::F32 => "float32",
        }
    }
}

// =============================================================================
// Samples
// =============================================================================

/// Sample storage, one variant per [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    F32(Vec<f32>),
}

impl Samples {
    fn zeroed(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::U8 => Samples::U8(vec![0; len]),
            DataType::U16 => Samples::U16(vec![0; len]),
            DataType::I16 => Samples::I16(vec![0; len]),
            DataType::F32 => Samples::F32(vec![0.0; len]),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Samples::U8(_) => DataType::U8,
            Samples::U16(_) => DataType::U16,
            Samples::I16(_) => DataType::I16,
            Samples::F32(_) => DataType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::I16(v) => v.len(),
            Samples::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Raster
// =============================================================================

/// A block of interleaved pixel samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: usize,
    samples: Samples,
}

impl Raster {
    /// Create a zero-filled raster.
    pub fn new(width: u32, height: u32, channels: usize, data_type: DataType) -> Self {
        let len = width as usize * height as usize * channels;
        Self {
            width,
            height,
            channels,
            samples: Samples::zeroed(data_type, len),
        }
    }

    /// Create a raster filled with `value` (cast to the sample type).
    pub fn filled(width: u32, height: u32, channels: usize, data_type: DataType, value: f64) -> Self {
        let mut raster = Self::new(width, height, channels, data_type);
        raster.fill(value);
        raster
    }

    /// Create a zero-filled raster of `size`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative size.
    pub fn with_size(size: Size, channels: usize, data_type: DataType) -> Result<Self, SlideError> {
        if size.is_negative() {
            return Err(SlideError::invalid_argument(format!(
                "negative raster size {}",
                size
            )));
        }
        Ok(Self::new(
            size.width as u32,
            size.height as u32,
            channels,
            data_type,
        ))
    }

    /// Wrap existing samples.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sample count does not match
    /// `width * height * channels`.
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: usize,
        samples: Samples,
    ) -> Result<Self, SlideError> {
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(SlideError::invalid_argument(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data_type(&self) -> DataType {
        self.samples.data_type()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    /// True when the raster holds no pixel.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0
    }

    /// Memory footprint of the samples in bytes.
    pub fn byte_size(&self) -> usize {
        self.samples.len() * self.data_type().size()
    }

    /// Read one sample as `f64`.
    ///
    /// Returns `None` outside the raster.
    pub fn sample(&self, x: u32, y: u32, channel: usize) -> Option<f64> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        let i = self.index(x, y) + channel;
        Some(match &self.samples {
            Samples::U8(v) => v[i] as f64,
            Samples::U16(v) => v[i] as f64,
            Samples::I16(v) => v[i] as f64,
            Samples::F32(v) => v[i] as f64,
        })
    }

    /// Overwrite every sample with `value`, saturating to the sample type.
    pub fn fill(&mut self, value: f64) {
        match &mut self.samples {
            Samples::U8(v) => v.fill(value.clamp(0.0, u8::MAX as f64) as u8),
            Samples::U16(v) => v.fill(value.clamp(0.0, u16::MAX as f64) as u16),
            Samples::I16(v) => v.fill(value.clamp(i16::MIN as f64, i16::MAX as f64) as i16),
            Samples::F32(v) => v.fill(value as f32),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Copy the `region` of this raster into a new raster.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `region` is malformed or not inside the raster.
    pub fn crop(&self, region: Rect) -> Result<Raster, SlideError> {
        let mut out = Raster::with_size(region.size(), self.channels, self.data_type())?;
        self.copy_region_into(region, &mut out, 0, 0)?;
        Ok(out)
    }

    /// Copy `region` of this raster into `target` at `(target_x, target_y)`.
    ///
    /// Both rasters must share data type and channel count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` on layout mismatch and `InvalidArgument` if the
    /// region does not fit in either raster.
    pub fn copy_region_into(
        &self,
        region: Rect,
        target: &mut Raster,
        target_x: i32,
        target_y: i32,
    ) -> Result<(), SlideError> {
        if self.data_type() != target.data_type() || self.channels != target.channels {
            return Err(SlideError::invalid_state(format!(
                "raster layout mismatch: {} x {} channels into {} x {} channels",
                self.data_type().name(),
                self.channels,
                target.data_type().name(),
                target.channels
            )));
        }
        if region.is_malformed() || !self.bounds().contains_rect(&region) {
            return Err(SlideError::invalid_argument(format!(
                "source region {} outside raster {}",
                region,
                self.size()
            )));
        }
        let destination = Rect::new(target_x, target_y, region.width, region.height);
        if !target.bounds().contains_rect(&destination) {
            return Err(SlideError::invalid_argument(format!(
                "target region {} outside raster {}",
                destination,
                target.size()
            )));
        }
        if region.is_empty() {
            return Ok(());
        }

        let row_len = region.width as usize * self.channels;
        let src_offsets: Vec<usize> = (0..region.height)
            .map(|row| self.index(region.x as u32, (region.y + row) as u32))
            .collect();
        let dst_offsets: Vec<usize> = (0..region.height)
            .map(|row| target.index(target_x as u32, (target_y + row) as u32))
            .collect();

        match (&self.samples, &mut target.samples) {
            (Samples::U8(s), Samples::U8(d)) => copy_rows(s, d, &src_offsets, &dst_offsets, row_len),
            (Samples::U16(s), Samples::U16(d)) => {
                copy_rows(s, d, &src_offsets, &dst_offsets, row_len)
            }
            (Samples::I16(s), Samples::I16(d)) => {
                copy_rows(s, d, &src_offsets, &dst_offsets, row_len)
            }
            (Samples::F32(s), Samples::F32(d)) => {
                copy_rows(s, d, &src_offsets, &dst_offsets, row_len)
            }
            _ => {
                return Err(SlideError::invalid_state(
                    "raster sample storage does not match its data type",
                ))
            }
        }
        Ok(())
    }

    /// Build a raster holding the listed channels, in list order.
    ///
    /// An empty list returns a copy with all channels. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a channel index out of range.
    pub fn select_channels(&self, channels: &[usize]) -> Result<Raster, SlideError> {
        if channels.is_empty() || is_identity_channel_list(channels, self.channels) {
            return Ok(self.clone());
        }
        if let Some(&bad) = channels.iter().find(|&&c| c >= self.channels) {
            return Err(SlideError::invalid_argument(format!(
                "channel {} out of range (raster has {} channels)",
                bad, self.channels
            )));
        }

        let pixels = self.width as usize * self.height as usize;
        let samples = match &self.samples {
            Samples::U8(v) => Samples::U8(pick_channels(v, pixels, self.channels, channels)),
            Samples::U16(v) => Samples::U16(pick_channels(v, pixels, self.channels, channels)),
            Samples::I16(v) => Samples::I16(pick_channels(v, pixels, self.channels, channels)),
            Samples::F32(v) => Samples::F32(pick_channels(v, pixels, self.channels, channels)),
        };
        Raster::from_samples(self.width, self.height, channels.len(), samples)
    }
}

/// True if `channels` is exactly `0..count`.
pub fn is_identity_channel_list(channels: &[usize], count: usize) -> bool {
    channels.len() == count && channels.iter().enumerate().all(|(i, &c)| i == c)
}

fn copy_rows<T: Copy>(src: &[T], dst: &mut [T], src_offsets: &[usize], dst_offsets: &[usize], row_len: usize) {
    for (&s, &d) in src_offsets.iter().zip(dst_offsets) {
        dst[d..d + row_len].copy_from_slice(&src[s..s + row_len]);
    }
}

fn pick_channels<T: Copy>(src: &[T], pixels: usize, stride: usize, channels: &[usize]) -> Vec<T> {
    let mut out = Vec::with_capacity(pixels * channels.len());
    for pixel in src.chunks_exact(stride).take(pixels) {
        out.extend(channels.iter().map(|&c| pixel[c]));
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
