//! Source and sink seams for the streaming loop.

use crate::stream_spec::StreamSpec;

/// A sequential source of interleaved float frames.
pub trait AudioSource {
    /// Error produced by the underlying reader.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The stream's sample rate and channel count.
    fn spec(&self) -> StreamSpec;

    /// Fill `interleaved` with up to `interleaved.len() / channels` frames
    /// and return the number of frames actually read.
    ///
    /// A return value smaller than the requested frame count signals
    /// end-of-stream. Read failures are reported as errors, never as a
    /// short read.
    fn read_block(&mut self, interleaved: &mut [f32]) -> Result<usize, Self::Error>;
}

/// A sequential sink for interleaved fixed-point frames.
pub trait AudioSink {
    /// Error produced by the underlying writer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write `num_frames` frames; `interleaved` holds exactly
    /// `num_frames × channels` samples.
    fn write_block(&mut self, interleaved: &[i32], num_frames: usize) -> Result<(), Self::Error>;

    /// Flush and finalize the sink. Called exactly once, after the final
    /// block has been written.
    fn finish(&mut self) -> Result<(), Self::Error>;
}
