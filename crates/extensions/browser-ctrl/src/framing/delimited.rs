//! Delimiter-terminated framing.

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::FrameError;

/// Splits a byte stream on a single delimiter byte.
///
/// The delimiter is stripped from decoded frames and appended to encoded ones.
#[derive(Debug, Clone)]
pub struct DelimitedCodec {
    delimiter: u8,
    /// Index in the buffer up to which no delimiter has been found.
    next_index: usize,
}

impl DelimitedCodec {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            next_index: 0,
        }
    }

    /// Newline-delimited frames.
    pub fn newline() -> Self {
        Self::new(b'\n')
    }
}

impl Default for DelimitedCodec {
    fn default() -> Self {
        Self::newline()
    }
}

impl Decoder for DelimitedCodec {
    type Item = BytesMut;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, FrameError> {
        let found = src[self.next_index..]
            .iter()
            .position(|&b| b == self.delimiter);

        match found {
            Some(offset) => {
                let end = self.next_index + offset;
                self.next_index = 0;
                let mut frame = src.split_to(end + 1);
                frame.truncate(end);
                Ok(Some(frame))
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }
}

impl Encoder<Bytes> for DelimitedCodec {
    type Error = FrameError;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.reserve(payload.len() + 1);
        dst.put_slice(&payload);
        dst.put_u8(self.delimiter);
        Ok(())
    }
}
