//! Upload normalization to canonical PCM WAV
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, MP4/AAC), then
//! re-encodes to mono 16-bit linear PCM WAV entirely in memory. The byte
//! stream is what gets POSTed to the speech-to-text endpoint.

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use thiserror::Error;

/// Errors raised while converting an upload. All of these are terminal for
/// the current upload; callers must not retry conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Unsupported audio format: {0} (supported: wav, mp3, mp4)")]
    UnsupportedFormat(String),

    #[error("Failed to read audio container: {0}")]
    Probe(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("No audio track found in file")]
    NoAudioTrack,

    #[error("Audio stream contains no samples")]
    EmptyStream,

    #[error("Failed to encode WAV output: {0}")]
    Encode(#[from] hound::Error),
}

/// Declared container format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Mp4,
}

impl AudioFormat {
    /// Infer the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, ConversionError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "mp4" => Ok(Self::Mp4),
            other => Err(ConversionError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Extension used as a probe hint for symphonia.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
        }
    }
}

/// One uploaded audio file, held only until conversion completes.
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub file_name: String,
    pub format: AudioFormat,
    pub bytes: Vec<u8>,
}

impl AudioBlob {
    /// Build a blob from raw bytes, inferring the format from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ConversionError> {
        let file_name = file_name.into();
        let format = AudioFormat::from_file_name(&file_name)?;
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }
}

/// Canonical mono 16-bit PCM WAV stream, consumed exactly once by the
/// transcriber.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    /// Complete WAV byte stream (header + samples)
    pub wav_bytes: Vec<u8>,
    /// Sample rate carried over from the source
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration_secs: f64,
}

/// Convert an upload to canonical mono 16-bit PCM WAV.
///
/// Takes the blob by value: the raw upload is discarded once converted.
pub fn normalize(blob: AudioBlob) -> Result<NormalizedAudio, ConversionError> {
    tracing::debug!(
        file = %blob.file_name,
        format = blob.format.extension(),
        size = blob.bytes.len(),
        "Normalizing upload"
    );

    let mss = MediaSourceStream::new(Box::new(Cursor::new(blob.bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(blob.format.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConversionError::Probe(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ConversionError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(ConversionError::NoAudioTrack)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ConversionError::Decode(e.to_string()))?;

    // Decode every packet, downmixing to mono as we go.
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(ConversionError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| ConversionError::Decode(e.to_string()))?;

        append_mono(&decoded, &mut samples);
    }

    if samples.is_empty() {
        return Err(ConversionError::EmptyStream);
    }

    let duration_secs = samples.len() as f64 / sample_rate as f64;
    let wav_bytes = encode_wav(&samples, sample_rate)?;

    tracing::debug!(
        sample_rate = sample_rate,
        samples = samples.len(),
        duration_secs = format!("{:.2}", duration_secs),
        "Normalization complete"
    );

    Ok(NormalizedAudio {
        wav_bytes,
        sample_rate,
        duration_secs,
    })
}

/// Downmix a decoded buffer to mono f32 and append to `out`.
fn append_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    fn to_f32_sample<S: Sample>(sample: S) -> f32
    where
        f32: FromSample<S>,
    {
        f32::from_sample(sample)
    }

    macro_rules! mix {
        ($buf:expr) => {{
            let buf = $buf;
            let channels = buf.spec().channels.count();
            let frames = buf.frames();
            out.reserve(frames);

            for frame in 0..frames {
                let mut sum = 0.0f32;
                for ch in 0..channels {
                    sum += to_f32_sample(buf.chan(ch)[frame]);
                }
                out.push(sum / channels as f32);
            }
        }};
    }

    match decoded {
        AudioBufferRef::U8(buf) => mix!(buf),
        AudioBufferRef::U16(buf) => mix!(buf),
        AudioBufferRef::U24(buf) => mix!(buf),
        AudioBufferRef::U32(buf) => mix!(buf),
        AudioBufferRef::S8(buf) => mix!(buf),
        AudioBufferRef::S16(buf) => mix!(buf),
        AudioBufferRef::S24(buf) => mix!(buf),
        AudioBufferRef::S32(buf) => mix!(buf),
        AudioBufferRef::F32(buf) => mix!(buf),
        AudioBufferRef::F64(buf) => mix!(buf),
    }
}

/// Encode mono f32 samples as a 16-bit PCM WAV byte stream.
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
