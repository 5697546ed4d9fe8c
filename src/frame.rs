use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("frame dimensions must be nonzero, got {width}x{height}")]
    ZeroDimensions { width: usize, height: usize },

    #[error("frame file is {len} bytes, shorter than one {frame_size}-byte frame")]
    ShortFile { len: u64, frame_size: usize },

    #[error("frame rate must be nonzero")]
    ZeroFrameRate,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Raw pixel layouts the tools understand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum PixelFormat {
    /// 8-bit interleaved red, green, blue
    Rgb,

    /// 8-bit grayscale
    Gray8,

    /// 16-bit grayscale, big endian
    Gray16Be,

    /// 16-bit grayscale, little endian
    Gray16Le,
}

impl PixelFormat {
    /// Bytes per pixel, no padding in any format.
    pub fn pixel_size(&self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Gray8 => 1,
            PixelFormat::Gray16Be | PixelFormat::Gray16Le => 2,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgb => "RGB",
            PixelFormat::Gray8 => "GRAY8",
            PixelFormat::Gray16Be => "GRAY16_BE",
            PixelFormat::Gray16Le => "GRAY16_LE",
        };
        f.write_str(name)
    }
}

/// Width, height and pixel format of a frame. The consumer of a raw frame
/// file or stream must know these out of band; nothing in the byte stream
/// carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParameters {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
}

impl FrameParameters {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            format,
        })
    }

    pub fn size_pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn frame_size_bytes(&self) -> usize {
        self.size_pixels() * self.format.pixel_size()
    }
}

/// One image's worth of pixel data, row-major, channels interleaved.
pub struct Frame {
    params: FrameParameters,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(params: FrameParameters) -> Self {
        Self {
            params,
            data: vec![0; params.frame_size_bytes()],
        }
    }

    pub fn params(&self) -> FrameParameters {
        self.params
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
