// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/codec.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements line framing for worker connections, located in the
// pool subdirectory. Lines are bounded by MAX_LINE_LENGTH; an over-length or
// non UTF-8 line is surfaced as a frame of its own so the connection loop can
// count it and keep reading.
//
// Tree Location:
// - src/pool/codec.rs (bounded line framing)
// - Depends on: tokio-util, bytes

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

/// Longest accepted line, newline excluded
pub const MAX_LINE_LENGTH: usize = 1 << 16;

/// One framed unit read from a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerFrame {
    Line(String),
    /// A line longer than MAX_LINE_LENGTH; the rest of it is discarded up to
    /// the next newline
    TooLong,
    InvalidUtf8,
}

/// LinesCodec that reports framing problems as frames instead of errors,
/// since FramedRead ends the stream after any decoder error.
#[derive(Debug)]
pub struct WorkerLineCodec {
    inner: LinesCodec,
}

impl WorkerLineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_length),
        }
    }

    fn map(result: Result<Option<String>, LinesCodecError>) -> Result<Option<WorkerFrame>, io::Error> {
        match result {
            Ok(line) => Ok(line.map(WorkerFrame::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(WorkerFrame::TooLong)),
            Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                Ok(Some(WorkerFrame::InvalidUtf8))
            }
            Err(LinesCodecError::Io(e)) => Err(e),
        }
    }
}

impl Default for WorkerLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for WorkerLineCodec {
    type Item = WorkerFrame;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<WorkerFrame>, io::Error> {
        Self::map(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<WorkerFrame>, io::Error> {
        Self::map(self.inner.decode_eof(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut WorkerLineCodec, input: &[u8]) -> Vec<WorkerFrame> {
        let mut buf = BytesMut::from(input);
        let mut frames = Vec::new();
        while let Some(frame) = codec.decode(&mut buf).unwrap() {
            frames.push(frame);
        }
        while let Some(frame) = codec.decode_eof(&mut buf).unwrap() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn test_splits_lines_and_strips_carriage_return() {
        let mut codec = WorkerLineCodec::new();
        let frames = decode_all(&mut codec, b"{\"a\":1}\r\n\n{\"b\":2}");
        assert_eq!(
            frames,
            vec![
                WorkerFrame::Line("{\"a\":1}".to_string()),
                WorkerFrame::Line(String::new()),
                WorkerFrame::Line("{\"b\":2}".to_string()),
            ]
        );
    }

    #[test]
    fn test_over_length_line_is_reported_once_and_skipped() {
        let mut codec = WorkerLineCodec::with_max_length(8);
        let mut input = vec![b'a'; 100];
        input.extend_from_slice(b"\nok\n");
        let frames = decode_all(&mut codec, &input);
        assert_eq!(frames, vec![WorkerFrame::TooLong, WorkerFrame::Line("ok".to_string())]);
    }

    #[test]
    fn test_invalid_utf8_does_not_end_the_stream() {
        let mut codec = WorkerLineCodec::new();
        let frames = decode_all(&mut codec, &[0xff, 0xfe, b'\n', b'x', b'\n']);
        assert_eq!(frames, vec![WorkerFrame::InvalidUtf8, WorkerFrame::Line("x".to_string())]);
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Bounded line framing for worker connections.
//   - Wraps tokio-util's LinesCodec with a 64 KiB limit.
//   - Over-length and non UTF-8 lines become frames, keeping the session open.
