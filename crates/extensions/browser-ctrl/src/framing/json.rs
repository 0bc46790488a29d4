//! JSON payloads on top of a byte framing.

use bytes::{Bytes, BytesMut};
use serde_json::Value;
use tokio_util::codec::{Decoder, Encoder};

use super::{DelimitedCodec, FrameError, LengthPrefixedCodec};

/// A byte framing that can carry JSON documents.
pub trait JsonFraming: Decoder<Item = BytesMut, Error = FrameError> {
    /// Whether an empty or whitespace-only frame is padding to skip rather
    /// than a payload to parse.
    const SKIPS_BLANK_FRAMES: bool;
}

impl JsonFraming for DelimitedCodec {
    const SKIPS_BLANK_FRAMES: bool = true;
}

/// A length prefix always announces a document, so `0:` is malformed.
impl JsonFraming for LengthPrefixedCodec {
    const SKIPS_BLANK_FRAMES: bool = false;
}

/// Decodes each frame of the inner codec as a JSON document.
///
/// Blank lines between delimited frames are skipped.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec<C> {
    inner: C,
}

impl<C> JsonCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl JsonCodec<LengthPrefixedCodec> {
    /// JSON in `<len>:<payload>` frames.
    pub fn length_prefixed() -> Self {
        Self::new(LengthPrefixedCodec::new())
    }
}

impl JsonCodec<DelimitedCodec> {
    /// Newline-delimited JSON.
    pub fn newline() -> Self {
        Self::new(DelimitedCodec::newline())
    }
}

fn parse_frame<C: JsonFraming>(frame: &BytesMut) -> Result<Option<Value>, FrameError> {
    if C::SKIPS_BLANK_FRAMES && frame.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(frame)?))
}

impl<C: JsonFraming> Decoder for JsonCodec<C> {
    type Item = Value;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>, FrameError> {
        while let Some(frame) = self.inner.decode(src)? {
            if let Some(value) = parse_frame::<C>(&frame)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Value>, FrameError> {
        while let Some(frame) = self.inner.decode_eof(src)? {
            if let Some(value) = parse_frame::<C>(&frame)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl<C> Encoder<Value> for JsonCodec<C>
where
    C: Encoder<Bytes, Error = FrameError>,
{
    type Error = FrameError;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<(), FrameError> {
        let payload = serde_json::to_vec(&item)?;
        self.inner.encode(Bytes::from(payload), dst)
    }
}
