//! `<len>:<payload>` framing.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::FrameError;

/// Longest length prefix accepted, in decimal digits.
pub const MAX_PREFIX_DIGITS: usize = 10;

/// Largest payload accepted in one frame.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Upper bound on buffer growth requested for a single partial frame.
const MAX_RESERVE: usize = 1 << 20;

/// Splits a byte stream into `<decimal length>:<payload>` frames.
///
/// The decoder keeps the parsed length between calls, so a header that
/// arrived in one read and a payload that trickles in over several reads
/// decode to a single frame.
#[derive(Debug, Clone, Default)]
pub struct LengthPrefixedCodec {
    /// Payload length of the frame currently being read.
    pending_len: Option<usize>,
}

impl LengthPrefixedCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the length header at the front of `src`.
    ///
    /// Returns `Ok(None)` when the colon has not arrived yet.
    fn decode_header(src: &mut BytesMut) -> Result<Option<usize>, FrameError> {
        let scan = src.len().min(MAX_PREFIX_DIGITS + 1);
        let Some(colon) = src[..scan].iter().position(|&b| b == b':') else {
            if let Some(bad) = src[..scan].iter().find(|b| !b.is_ascii_digit()) {
                return Err(FrameError::InvalidLength(format!(
                    "unexpected byte {:#04x} in length prefix",
                    bad
                )));
            }
            if src.len() > MAX_PREFIX_DIGITS {
                return Err(FrameError::InvalidLength(format!(
                    "length prefix longer than {} digits",
                    MAX_PREFIX_DIGITS
                )));
            }
            return Ok(None);
        };

        let digits = &src[..colon];
        if digits.is_empty() {
            return Err(FrameError::InvalidLength("empty length prefix".to_string()));
        }
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(FrameError::InvalidLength(format!(
                "non-digit length prefix {:?}",
                String::from_utf8_lossy(digits)
            )));
        }

        // All ASCII digits, at most MAX_PREFIX_DIGITS of them: fits in usize on 64-bit.
        let len = digits
            .iter()
            .try_fold(0usize, |acc, &d| {
                acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
            })
            .ok_or_else(|| FrameError::InvalidLength("length prefix overflows".to_string()))?;
        if len > MAX_FRAME_LEN {
            return Err(FrameError::InvalidLength(format!(
                "frame of {} bytes exceeds the {} byte limit",
                len, MAX_FRAME_LEN
            )));
        }

        src.advance(colon + 1);
        Ok(Some(len))
    }
}

impl Decoder for LengthPrefixedCodec {
    type Item = BytesMut;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, FrameError> {
        let len = match self.pending_len {
            Some(len) => len,
            None => match Self::decode_header(src)? {
                Some(len) => {
                    self.pending_len = Some(len);
                    len
                }
                None => return Ok(None),
            },
        };

        if src.len() < len {
            src.reserve((len - src.len()).min(MAX_RESERVE));
            return Ok(None);
        }

        self.pending_len = None;
        Ok(Some(src.split_to(len)))
    }
}

impl Encoder<Bytes> for LengthPrefixedCodec {
    type Error = FrameError;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<(), FrameError> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(FrameError::InvalidLength(format!(
                "frame of {} bytes exceeds the {} byte limit",
                payload.len(),
                MAX_FRAME_LEN
            )));
        }
        let header = format!("{}:", payload.len());
        dst.reserve(header.len() + payload.len());
        dst.put_slice(header.as_bytes());
        dst.put_slice(&payload);
        Ok(())
    }
}
