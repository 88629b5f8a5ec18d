//! Storage compression of scene pixel data.

use std::fmt;

use serde::Serialize;

/// Compression of the pixel data a scene is decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Compression {
    /// Not reported by the container
    #[default]
    Unknown,
    Uncompressed,
    Jpeg,
    JpegXr,
    Jpeg2000,
    Png,
    Lzw,
    Zlib,
    PackBits,
    /// Run-length encoding
    Rle,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Unknown => "unknown",
            Compression::Uncompressed => "uncompressed",
            Compression::Jpeg => "JPEG",
            Compression::JpegXr => "JPEG XR",
            Compression::Jpeg2000 => "JPEG 2000",
            Compression::Png => "PNG",
            Compression::Lzw => "LZW",
            Compression::Zlib => "zlib",
            Compression::PackBits => "PackBits",
            Compression::Rle => "RLE",
        }
    }

    /// Whether decoding reproduces the stored samples exactly.
    ///
    /// `None` when the compression is unknown.
    pub fn is_lossless(&self) -> Option<bool> {
        match self {
            Compression::Unknown => None,
            Compression::Jpeg | Compression::JpegXr => Some(false),
            // Both lossy and lossless JPEG 2000 exist.
            Compression::Jpeg2000 => None,
            _ => Some(true),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
