//! WAV-file adapters for the source and sink seams.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::io::{AudioSink, AudioSource};
use crate::stream_spec::{StreamSpec, StreamSpecError};

/// Bit depth of the fixed output sample format.
const OUTPUT_BITS: u16 = 32;

/// Error produced by the WAV adapters.
#[derive(Debug)]
pub enum WavError {
    /// Error from the underlying WAV codec or file I/O.
    Wav(hound::Error),
    /// The file's stream parameters are unsupported.
    Spec(StreamSpecError),
    /// A write was attempted after the sink was finalized.
    Finished,
}

impl std::fmt::Display for WavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wav(err) => write!(f, "wav error: {err}"),
            Self::Spec(err) => write!(f, "unsupported stream: {err}"),
            Self::Finished => write!(f, "sink already finalized"),
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wav(err) => Some(err),
            Self::Spec(err) => Some(err),
            Self::Finished => None,
        }
    }
}

impl From<hound::Error> for WavError {
    fn from(err: hound::Error) -> Self {
        Self::Wav(err)
    }
}

impl From<StreamSpecError> for WavError {
    fn from(err: StreamSpecError) -> Self {
        Self::Spec(err)
    }
}

/// Reads interleaved float frames from a WAV file.
///
/// Integer samples of any bit depth are scaled to `[-1.0, 1.0)` by
/// `1 / 2^(bits - 1)`; float samples pass through unchanged.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
    spec: StreamSpec,
    sample_format: SampleFormat,
    scale: f32,
}

impl std::fmt::Debug for WavSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSource")
            .field("spec", &self.spec)
            .field("sample_format", &self.sample_format)
            .finish_non_exhaustive()
    }
}

impl WavSource {
    /// Open a WAV file for sequential block reads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WavError> {
        let reader = WavReader::open(path)?;
        let wav_spec = reader.spec();
        let spec = StreamSpec::new(wav_spec.sample_rate, wav_spec.channels)?;
        let scale = match wav_spec.sample_format {
            SampleFormat::Float => 1.0,
            SampleFormat::Int => 1.0 / (1_i64 << (wav_spec.bits_per_sample - 1)) as f32,
        };
        Ok(Self {
            reader,
            spec,
            sample_format: wav_spec.sample_format,
            scale,
        })
    }

    /// Total number of frames in the file.
    pub fn duration_frames(&self) -> u32 {
        self.reader.duration()
    }
}

impl AudioSource for WavSource {
    type Error = WavError;

    fn spec(&self) -> StreamSpec {
        self.spec
    }

    fn read_block(&mut self, interleaved: &mut [f32]) -> Result<usize, WavError> {
        let channels = self.spec.num_channels() as usize;
        // Only whole frames; a trailing partial frame in a malformed file
        // is dropped.
        let max_samples = (interleaved.len() / channels) * channels;
        let mut filled = 0;
        match self.sample_format {
            SampleFormat::Float => {
                let mut samples = self.reader.samples::<f32>();
                while filled < max_samples {
                    match samples.next() {
                        Some(sample) => {
                            interleaved[filled] = sample?;
                            filled += 1;
                        }
                        None => break,
                    }
                }
            }
            SampleFormat::Int => {
                let mut samples = self.reader.samples::<i32>();
                while filled < max_samples {
                    match samples.next() {
                        Some(sample) => {
                            interleaved[filled] = sample? as f32 * self.scale;
                            filled += 1;
                        }
                        None => break,
                    }
                }
            }
        }
        Ok(filled / channels)
    }
}

/// Writes interleaved 32-bit integer frames to a WAV file.
///
/// The output format is fixed: signed 32-bit integer PCM at the sample rate
/// handed to [`create`](Self::create).
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
    num_channels: u16,
}

impl std::fmt::Debug for WavSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSink")
            .field("num_channels", &self.num_channels)
            .field("finished", &self.writer.is_none())
            .finish_non_exhaustive()
    }
}

impl WavSink {
    /// Create a WAV file for sequential block writes.
    pub fn create<P: AsRef<Path>>(
        path: P,
        sample_rate_hz: u32,
        num_channels: u16,
    ) -> Result<Self, WavError> {
        let spec = StreamSpec::new(sample_rate_hz, num_channels)?;
        let wav_spec = WavSpec {
            channels: spec.num_channels(),
            sample_rate: spec.sample_rate_hz(),
            bits_per_sample: OUTPUT_BITS,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, wav_spec)?;
        Ok(Self {
            writer: Some(writer),
            num_channels,
        })
    }
}

impl AudioSink for WavSink {
    type Error = WavError;

    fn write_block(&mut self, interleaved: &[i32], num_frames: usize) -> Result<(), WavError> {
        debug_assert_eq!(interleaved.len(), num_frames * self.num_channels as usize);
        let writer = self.writer.as_mut().ok_or(WavError::Finished)?;
        for &sample in interleaved {
            writer.write_sample(sample)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WavError> {
        let writer = self.writer.take().ok_or(WavError::Finished)?;
        writer.finalize()?;
        Ok(())
    }
}
