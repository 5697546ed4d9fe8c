use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::frame::{Frame, FrameError, FrameParameters};
use crate::gradient::{self, CYCLE_PERIOD};

/// Yields one frame's worth of pixel bytes per call.
pub trait FrameSource {
    fn frame_params(&self) -> FrameParameters;

    fn next_frame(&mut self) -> Result<Frame, FrameError>;
}

/// Replays raw concatenated frames from a file, seeking back to offset
/// zero at end of file. A trailing partial frame is dropped by the same
/// seek, so consumers only ever see whole frames.
#[derive(Debug)]
pub struct FileFrameSource {
    reader: BufReader<File>,
    params: FrameParameters,
}

impl FileFrameSource {
    /// Open a frame file. Files shorter than one whole frame are
    /// rejected so the replay loop cannot spin without producing data.
    pub fn open<P: AsRef<Path>>(path: P, params: FrameParameters) -> Result<Self, FrameError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let frame_size = params.frame_size_bytes();
        if len < frame_size as u64 {
            return Err(FrameError::ShortFile { len, frame_size });
        }
        Ok(Self {
            reader: BufReader::new(file),
            params,
        })
    }

    /// Read until `buf` is full or the file runs out.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}

impl FrameSource for FileFrameSource {
    fn frame_params(&self) -> FrameParameters {
        self.params
    }

    fn next_frame(&mut self) -> Result<Frame, FrameError> {
        let mut frame = Frame::new(self.params);
        let frame_size = frame.data().len();
        let n = self.read_full(frame.data_mut())?;
        if n < frame_size {
            debug!(read = n, "frame file exhausted, replaying from start");
            self.reader.seek(SeekFrom::Start(0))?;
            let n = self.read_full(frame.data_mut())?;
            if n < frame_size {
                // The file shrank underneath us since open.
                return Err(FrameError::ShortFile {
                    len: n as u64,
                    frame_size,
                });
            }
        }
        Ok(frame)
    }
}

/// Serves the generated gradient pattern, advancing one step per frame.
pub struct PatternSource {
    params: FrameParameters,
    step: u32,
}

impl PatternSource {
    pub fn new(params: FrameParameters) -> Self {
        Self { params, step: 0 }
    }
}

impl FrameSource for PatternSource {
    fn frame_params(&self) -> FrameParameters {
        self.params
    }

    fn next_frame(&mut self) -> Result<Frame, FrameError> {
        let frame = gradient::gradient_frame(self.params, self.step);
        self.step = (self.step + 1) % CYCLE_PERIOD;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_fixture(bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("framegen-test-{}.raw", Uuid::new_v4()));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn small_params() -> FrameParameters {
        FrameParameters::new(2, 2, PixelFormat::Gray8).unwrap()
    }

    #[test]
    fn file_source_loops_back_to_start() {
        let params = small_params();
        let first = [1u8, 2, 3, 4];
        let second = [5u8, 6, 7, 8];
        let mut bytes = first.to_vec();
        bytes.extend_from_slice(&second);
        let path = temp_fixture(&bytes);

        let mut source = FileFrameSource::open(&path, params).unwrap();
        assert_eq!(source.next_frame().unwrap().data(), &first);
        assert_eq!(source.next_frame().unwrap().data(), &second);
        // Third read hits EOF and must replay from offset zero.
        assert_eq!(source.next_frame().unwrap().data(), &first);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let params = small_params();
        let mut bytes = vec![1u8, 2, 3, 4];
        bytes.extend_from_slice(&[9, 9]); // half a frame
        let path = temp_fixture(&bytes);

        let mut source = FileFrameSource::open(&path, params).unwrap();
        assert_eq!(source.next_frame().unwrap().data(), &[1, 2, 3, 4]);
        assert_eq!(source.next_frame().unwrap().data(), &[1, 2, 3, 4]);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn sub_frame_file_rejected_at_open() {
        let params = small_params();
        let path = temp_fixture(&[1u8, 2]);

        let err = FileFrameSource::open(&path, params).unwrap_err();
        assert!(matches!(err, FrameError::ShortFile { len: 2, .. }));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn pattern_source_advances_per_frame() {
        let params = FrameParameters::new(8, 8, PixelFormat::Rgb).unwrap();
        let mut source = PatternSource::new(params);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_eq!(a.data(), gradient::gradient_frame(params, 0).data());
        assert_eq!(b.data(), gradient::gradient_frame(params, 1).data());
        assert_ne!(a.data(), b.data());
    }
}
