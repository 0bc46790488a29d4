use super::*;
use bytes::{Bytes, BytesMut};
use proptest::prelude::*;
use serde_json::json;
use tokio_util::codec::{Decoder, Encoder};

#[test]
fn test_length_prefixed_single_frame() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"5:hello"[..]);
    let frame = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(&frame[..], b"hello");
    assert!(buf.is_empty());
}

#[test]
fn test_length_prefixed_partial_header_and_payload() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"1"[..]);
    assert!(codec.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b"1:hello");
    assert!(codec.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b" world");
    let frame = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(&frame[..], b"hello world");
}

#[test]
fn test_length_prefixed_back_to_back_frames() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"2:ab3:cde0:"[..]);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"ab");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"cde");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"");
    assert!(codec.decode(&mut buf).unwrap().is_none());
}

#[test]
fn test_length_prefixed_rejects_non_digit() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"1x:abc"[..]);
    assert!(matches!(
        codec.decode(&mut buf),
        Err(FrameError::InvalidLength(_))
    ));
}

#[test]
fn test_length_prefixed_rejects_empty_length() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b":{}"[..]);
    assert!(matches!(
        codec.decode(&mut buf),
        Err(FrameError::InvalidLength(_))
    ));
}

#[test]
fn test_length_prefixed_rejects_overlong_prefix() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"123456789012"[..]);
    assert!(matches!(
        codec.decode(&mut buf),
        Err(FrameError::InvalidLength(_))
    ));
}

#[test]
fn test_length_prefixed_ten_digit_prefix_waits() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"0000000003"[..]);
    assert!(codec.decode(&mut buf).unwrap().is_none());
    buf.extend_from_slice(b":abc");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"abc");
}

#[test]
fn test_length_prefixed_partial_frame_at_eof() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(&b"10:abc"[..]);
    assert!(codec.decode_eof(&mut buf).is_err());
}

#[test]
fn test_length_prefixed_encode() {
    let mut codec = LengthPrefixedCodec::new();
    let mut dst = BytesMut::new();
    codec
        .encode(Bytes::from_static(b"{\"a\":1}"), &mut dst)
        .unwrap();
    assert_eq!(&dst[..], b"7:{\"a\":1}");
}

#[test]
fn test_length_prefixed_counts_bytes_not_chars() {
    let mut codec = LengthPrefixedCodec::new();
    let mut dst = BytesMut::new();
    codec
        .encode(Bytes::from("\"é\"".as_bytes().to_vec()), &mut dst)
        .unwrap();
    assert!(dst.starts_with(b"4:"));
}

#[test]
fn test_length_prefixed_payload_with_colons_and_newlines() {
    let payload: &[u8] = b"a:b\n12:c\n\n:";
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::new();
    codec.encode(Bytes::from_static(payload), &mut buf).unwrap();
    assert!(buf.starts_with(b"12:a:b\n"));

    buf.extend_from_slice(b"1:x");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], payload);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"x");
    assert!(buf.is_empty());
}

#[test]
fn test_length_prefixed_rejects_oversized_frame() {
    let mut codec = LengthPrefixedCodec::new();
    let mut buf = BytesMut::from(format!("{}:", MAX_FRAME_LEN + 1).as_bytes());
    match codec.decode(&mut buf) {
        Err(FrameError::InvalidLength(reason)) => assert!(reason.contains("limit")),
        other => panic!("expected InvalidLength, got {:?}", other),
    }

    let mut buf = BytesMut::from(format!("{}:", MAX_FRAME_LEN).as_bytes());
    assert!(codec.decode(&mut buf).unwrap().is_none());
}

#[test]
fn test_length_prefixed_encode_rejects_oversized_payload() {
    let mut codec = LengthPrefixedCodec::new();
    let mut dst = BytesMut::new();
    let payload = Bytes::from(vec![b' '; MAX_FRAME_LEN + 1]);
    assert!(matches!(
        codec.encode(payload, &mut dst),
        Err(FrameError::InvalidLength(_))
    ));
    assert!(dst.is_empty());
}

#[test]
fn test_delimited_splits_on_newline() {
    let mut codec = DelimitedCodec::newline();
    let mut buf = BytesMut::from(&b"one\ntw"[..]);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"one");
    assert!(codec.decode(&mut buf).unwrap().is_none());
    buf.extend_from_slice(b"o\n");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"two");
    assert!(buf.is_empty());
}

#[test]
fn test_delimited_custom_delimiter() {
    let mut codec = DelimitedCodec::new(0);
    let mut buf = BytesMut::from(&b"a\nb\0"[..]);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"a\nb");

    let mut dst = BytesMut::new();
    codec.encode(Bytes::from_static(b"c"), &mut dst).unwrap();
    assert_eq!(&dst[..], b"c\0");
}

#[test]
fn test_delimited_encode_appends_delimiter() {
    let mut codec = DelimitedCodec::newline();
    let mut dst = BytesMut::new();
    codec.encode(Bytes::from_static(b"{}"), &mut dst).unwrap();
    assert_eq!(&dst[..], b"{}\n");
}

#[test]
fn test_delimited_partial_frame_at_eof() {
    let mut codec = DelimitedCodec::newline();
    let mut buf = BytesMut::from(&b"{\"result\":"[..]);
    assert!(codec.decode_eof(&mut buf).is_err());
}

#[test]
fn test_json_over_length_prefix() {
    let mut codec = JsonCodec::length_prefixed();
    let mut buf = BytesMut::new();
    codec
        .encode(json!({"to": "root", "type": "listTabs"}), &mut buf)
        .unwrap();
    let value = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(value["type"], "listTabs");
}

#[test]
fn test_json_skips_blank_lines() {
    let mut codec = JsonCodec::newline();
    let mut buf = BytesMut::from(&b"\r\n\n{\"result\": 4}\r\n"[..]);
    let value = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(value["result"], 4);
}

#[test]
fn test_json_empty_length_prefixed_frame_is_an_error() {
    let mut codec = JsonCodec::length_prefixed();
    let mut buf = BytesMut::from(&b"0:2:{}"[..]);
    assert!(matches!(codec.decode(&mut buf), Err(FrameError::Json(_))));

    let mut codec = JsonCodec::length_prefixed();
    let mut buf = BytesMut::from(&b"1: "[..]);
    assert!(matches!(codec.decode(&mut buf), Err(FrameError::Json(_))));
}

#[test]
fn test_json_invalid_payload() {
    let mut codec = JsonCodec::length_prefixed();
    let mut buf = BytesMut::from(&b"3:{x}"[..]);
    assert!(matches!(codec.decode(&mut buf), Err(FrameError::Json(_))));
}

#[test]
fn test_frame_error_into_control_error() {
    let io = FrameError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "reset",
    ));
    assert!(matches!(ControlError::from(io), ControlError::Transport(_)));

    let bad = FrameError::InvalidLength("x".to_string());
    let err = ControlError::from(bad);
    assert!(matches!(err, ControlError::Decode(_)));
    assert!(err.is_fatal());
}

/// Feed `wire` to `codec` in chunks cut at `cuts`, collecting every frame.
fn decode_in_chunks(codec: &mut LengthPrefixedCodec, wire: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut bounds: Vec<usize> = cuts.iter().map(|&c| c.min(wire.len())).collect();
    bounds.push(wire.len());
    bounds.sort_unstable();

    let mut frames = Vec::new();
    let mut buf = BytesMut::new();
    let mut start = 0;
    for end in bounds {
        buf.extend_from_slice(&wire[start..end]);
        start = end;
        while let Some(frame) = codec.decode(&mut buf).unwrap() {
            frames.push(frame.to_vec());
        }
    }
    assert!(buf.is_empty());
    frames
}

proptest! {
    #[test]
    fn length_prefixed_round_trip_across_split_reads(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..6),
        cuts in prop::collection::vec(0usize..512, 0..8),
    ) {
        let mut codec = LengthPrefixedCodec::new();
        let mut wire = BytesMut::new();
        for payload in &payloads {
            codec.encode(Bytes::from(payload.clone()), &mut wire).unwrap();
        }

        let frames = decode_in_chunks(&mut codec, &wire, &cuts);
        prop_assert_eq!(frames, payloads);
    }
}
