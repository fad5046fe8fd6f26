//! Offline audio block transcoder.
//!
//! Bridges an interleaved file I/O API and a per-channel processing API:
//! fixed-size blocks are read from an [`AudioSource`], deinterleaved,
//! transformed by a [`BlockProcessor`], interleaved again, quantized to
//! 32-bit integers with saturation, and written to an [`AudioSink`]. The
//! output stream adopts the processor's output channel count.
//!
//! # Quick Start
//!
//! ```no_run
//! use sndpump::effects::Gain;
//! use sndpump::{AudioSource, BlockProcessor, WavSink, WavSource, pump};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = WavSource::open("in.wav")?;
//! let spec = source.spec();
//! let mut effect = Gain::from_db(spec.num_channels() as usize, -6.0);
//! let mut sink = WavSink::create(
//!     "out.wav",
//!     spec.sample_rate_hz(),
//!     effect.num_outputs() as u16,
//! )?;
//!
//! let stats = pump(&mut source, &mut effect, &mut sink)?;
//! println!("transcoded {} frames", stats.frames);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod deinterleaver;
pub mod effects;
mod interleaver;
mod io;
mod processor;
mod pump;
mod quantize;
mod stream_spec;
mod wav;

// Public re-exports.
pub use deinterleaver::Deinterleaver;
pub use interleaver::Interleaver;
pub use io::{AudioSink, AudioSource};
pub use processor::BlockProcessor;
pub use pump::{BLOCK_FRAMES, PumpError, PumpStats, pump};
pub use quantize::quantize_to_i32;
pub use stream_spec::{MAX_SAMPLE_RATE_HZ, MIN_SAMPLE_RATE_HZ, StreamSpec, StreamSpecError};
pub use wav::{WavError, WavSink, WavSource};
