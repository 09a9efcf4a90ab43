//! Audio normalization module for legallify
//!
//! Converts uploaded wav/mp3/mp4 files into the canonical mono 16-bit PCM
//! WAV stream the transcription endpoint expects.

mod normalizer;

pub use normalizer::{normalize, AudioBlob, AudioFormat, ConversionError, NormalizedAudio};
