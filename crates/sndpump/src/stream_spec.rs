//! Stream description shared by audio sources and sinks.

/// Minimum supported sample rate in Hz.
pub const MIN_SAMPLE_RATE_HZ: u32 = 8_000;
/// Maximum supported sample rate in Hz.
pub const MAX_SAMPLE_RATE_HZ: u32 = 384_000;

/// Error returned when creating a [`StreamSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSpecError {
    /// Sample rate is outside the supported range.
    UnsupportedSampleRate { sample_rate_hz: u32 },
    /// Stream has no channels.
    ZeroChannels,
}

impl std::fmt::Display for StreamSpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::UnsupportedSampleRate { sample_rate_hz } => write!(
                f,
                "unsupported sample rate {sample_rate_hz}; expected {MIN_SAMPLE_RATE_HZ}..={MAX_SAMPLE_RATE_HZ}",
            ),
            Self::ZeroChannels => write!(f, "stream must have at least one channel"),
        }
    }
}

impl std::error::Error for StreamSpecError {}

/// Validated description of an audio stream.
///
/// Invariants:
/// - `sample_rate_hz` is in `8000..=384000`.
/// - `num_channels` is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpec {
    sample_rate_hz: u32,
    num_channels: u16,
}

impl StreamSpec {
    /// Create a validated stream description.
    pub fn new(sample_rate_hz: u32, num_channels: u16) -> Result<Self, StreamSpecError> {
        if !(MIN_SAMPLE_RATE_HZ..=MAX_SAMPLE_RATE_HZ).contains(&sample_rate_hz) {
            return Err(StreamSpecError::UnsupportedSampleRate { sample_rate_hz });
        }
        if num_channels == 0 {
            return Err(StreamSpecError::ZeroChannels);
        }
        Ok(Self {
            sample_rate_hz,
            num_channels,
        })
    }

    /// The sampling rate in Hz.
    #[inline]
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// The number of interleaved channels.
    #[inline]
    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    /// Total number of samples in a block of `num_frames` frames
    /// (channels × frames).
    #[inline]
    pub fn samples_per_block(&self, num_frames: usize) -> usize {
        self.num_channels as usize * num_frames
    }
}
