//! RIFF/WAVE decoding into normalized float waveforms.
//!
//! Only uncompressed payloads are handled: integer PCM at 8/16/24/32 bits
//! and 32-bit IEEE float. Everything is little-endian.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::waveform::Waveform;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;
const FMT_BASE_LEN: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    Io,
    Format,
    UnsupportedFormat,
    Truncated,
    Allocation,
}

#[derive(Debug)]
pub enum DecodeError {
    /// The file could not be opened
    Open { path: PathBuf, source: io::Error },
    /// Read or seek failure on an open stream
    Io(io::Error),
    /// Bad RIFF/WAVE signature, missing or malformed chunk
    Format(&'static str),
    /// Valid WAVE, but a format code / bit depth we don't decode
    UnsupportedFormat { audio_format: u16, bits_per_sample: u16 },
    /// The data chunk declares more bytes than the stream holds
    Truncated { declared: u32, available: usize },
    /// Buffer sizing failed
    Allocation(usize),
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Open { .. } | DecodeError::Io(_) => DecodeErrorKind::Io,
            DecodeError::Format(_) => DecodeErrorKind::Format,
            DecodeError::UnsupportedFormat { .. } => DecodeErrorKind::UnsupportedFormat,
            DecodeError::Truncated { .. } => DecodeErrorKind::Truncated,
            DecodeError::Allocation(_) => DecodeErrorKind::Allocation,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Open { path, source } => {
                write!(f, "failed to open file {}: {}", path.display(), source)
            }
            DecodeError::Io(e) => write!(f, "read error: {}", e),
            DecodeError::Format(msg) => write!(f, "malformed wav: {}", msg),
            DecodeError::UnsupportedFormat { audio_format, bits_per_sample } => write!(
                f,
                "unsupported audio format {} with {} bits per sample",
                audio_format, bits_per_sample
            ),
            DecodeError::Truncated { declared, available } => write!(
                f,
                "truncated data chunk: declared {} bytes, found {}",
                declared, available
            ),
            DecodeError::Allocation(bytes) => {
                write!(f, "out of memory allocating {} bytes", bytes)
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Open { source, .. } => Some(source),
            DecodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::Io(e)
    }
}

#[derive(Clone, Copy, Debug)]
struct FmtChunk {
    audio_format: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

#[derive(Clone, Copy, Debug)]
struct DataChunk {
    offset: u64,
    size: u32,
}

// How one sample's bytes turn into a float in [-1, 1]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Encoding {
    Float32,
    Unsigned8,
    Signed16,
    Signed24,
    Signed32,
}

impl Encoding {
    fn from_fmt(fmt: &FmtChunk) -> Result<Self, DecodeError> {
        match (fmt.audio_format, fmt.bits_per_sample) {
            (FORMAT_IEEE_FLOAT, 32) => Ok(Encoding::Float32),
            (FORMAT_PCM, 8) => Ok(Encoding::Unsigned8),
            (FORMAT_PCM, 16) => Ok(Encoding::Signed16),
            (FORMAT_PCM, 24) => Ok(Encoding::Signed24),
            (FORMAT_PCM, 32) => Ok(Encoding::Signed32),
            (audio_format, bits_per_sample) => Err(DecodeError::UnsupportedFormat {
                audio_format,
                bits_per_sample,
            }),
        }
    }

    #[inline]
    fn decode(self, b: &[u8]) -> f32 {
        match self {
            Encoding::Float32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            Encoding::Unsigned8 => (b[0] as i32 - 128) as f32 / 128.0,
            Encoding::Signed16 => i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0,
            Encoding::Signed24 => {
                // load into the top 3 bytes, arithmetic shift drags bit 23 down
                let v = i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8;
                v as f32 / 8388608.0
            }
            Encoding::Signed32 => {
                i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32 / 2147483648.0
            }
        }
    }
}

/// Open and decode a WAV file. `downmix` averages all channels into one.
pub fn decode_file(path: &Path, downmix: bool) -> Result<Waveform, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&mut BufReader::new(file), downmix)
}

/// Decode a RIFF/WAVE stream into a waveform.
///
/// Chunks may appear in any order and unknown chunks are skipped. The data
/// chunk's location is recorded during the scan and read back afterwards,
/// so chunks after `data` are still seen. Bytes past the last full chunk
/// header are ignored.
pub fn decode<R: Read + Seek>(r: &mut R, downmix: bool) -> Result<Waveform, DecodeError> {
    let (fmt, data) = scan_chunks(r)?;

    // a zero-length payload counts as no data at all
    let data = data
        .filter(|d| d.size != 0)
        .ok_or(DecodeError::Format("no data chunk found"))?;
    let fmt = fmt
        .filter(|f| f.sample_rate != 0 && f.channels != 0 && f.bits_per_sample != 0)
        .ok_or(DecodeError::Format("fmt chunk not found or invalid"))?;
    let encoding = Encoding::from_fmt(&fmt)?;

    let raw = read_data(r, data)?;

    let bytes_per_sample = (fmt.bits_per_sample as usize).div_ceil(8);
    let channels = fmt.channels as usize;
    let frame_bytes = bytes_per_sample * channels;
    if frame_bytes == 0 {
        return Err(DecodeError::Format("invalid frame size"));
    }
    // a trailing partial frame is dropped
    let frame_count = raw.len() / frame_bytes;

    let mut interleaved: Vec<f32> = Vec::new();
    interleaved
        .try_reserve_exact(frame_count * channels)
        .map_err(|_| DecodeError::Allocation(frame_count * channels * size_of::<f32>()))?;
    for frame in raw.chunks_exact(frame_bytes) {
        for sample in frame.chunks_exact(bytes_per_sample) {
            interleaved.push(encoding.decode(sample));
        }
    }

    let (samples, out_channels) = if downmix && channels > 1 {
        (downmix_to_mono(&interleaved, channels), 1)
    } else {
        (interleaved, fmt.channels)
    };

    Ok(Waveform {
        samples,
        sample_rate: fmt.sample_rate,
        channels: out_channels,
        bits_per_sample: fmt.bits_per_sample,
    })
}

fn scan_chunks<R: Read + Seek>(
    r: &mut R,
) -> Result<(Option<FmtChunk>, Option<DataChunk>), DecodeError> {
    let mut header = [0u8; 12];
    if read_full(r, &mut header)? < header.len() {
        return Err(DecodeError::Format("stream too short for a RIFF header"));
    }
    if &header[0..4] != b"RIFF" {
        return Err(DecodeError::Format("not a RIFF file"));
    }
    // header[4..8] is the container size; the real stream length wins
    if &header[8..12] != b"WAVE" {
        return Err(DecodeError::Format("not a WAVE file"));
    }

    let mut fmt = None;
    let mut data = None;

    loop {
        let mut chunk_header = [0u8; 8];
        if read_full(r, &mut chunk_header)? < chunk_header.len() {
            break; // no more chunks
        }
        let size = u32::from_le_bytes([
            chunk_header[4],
            chunk_header[5],
            chunk_header[6],
            chunk_header[7],
        ]);
        let pad = (size & 1) as i64; // chunks are word aligned

        match &chunk_header[0..4] {
            b"fmt " => {
                if size < FMT_BASE_LEN {
                    return Err(DecodeError::Format("fmt chunk shorter than 16 bytes"));
                }
                let mut body = [0u8; FMT_BASE_LEN as usize];
                r.read_exact(&mut body).map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => DecodeError::Format("failed to read fmt chunk"),
                    _ => DecodeError::Io(e),
                })?;
                // byte rate (8..12) and block align (12..14) are not needed
                fmt = Some(FmtChunk {
                    audio_format: u16::from_le_bytes([body[0], body[1]]),
                    channels: u16::from_le_bytes([body[2], body[3]]),
                    sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
                    bits_per_sample: u16::from_le_bytes([body[14], body[15]]),
                });
                // extension fields (cbSize etc.)
                r.seek(SeekFrom::Current((size - FMT_BASE_LEN) as i64 + pad))?;
            }
            b"data" => {
                data = Some(DataChunk {
                    offset: r.stream_position()?,
                    size,
                });
                r.seek(SeekFrom::Current(size as i64 + pad))?;
            }
            _ => {
                r.seek(SeekFrom::Current(size as i64 + pad))?;
            }
        }
    }

    Ok((fmt, data))
}

fn read_data<R: Read + Seek>(r: &mut R, data: DataChunk) -> Result<Vec<u8>, DecodeError> {
    let declared = data.size as usize;
    r.seek(SeekFrom::Start(data.offset))?;

    let mut raw = Vec::new();
    raw.try_reserve_exact(declared)
        .map_err(|_| DecodeError::Allocation(declared))?;
    r.by_ref().take(data.size as u64).read_to_end(&mut raw)?;

    if raw.len() < declared {
        return Err(DecodeError::Truncated {
            declared: data.size,
            available: raw.len(),
        });
    }
    Ok(raw)
}

fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: f64 = frame.iter().map(|&s| s as f64).sum();
            (sum / channels as f64) as f32
        })
        .collect()
}

// Like read_exact, but reports how far it got instead of failing at EOF.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
