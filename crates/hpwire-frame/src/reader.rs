use std::io::{ErrorKind, Read};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{decode_frame, skip_to_delimiter, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads carriage-return delimited frames from any `Read` stream.
///
/// Handles partial reads internally. Unconsumed bytes stay buffered until a
/// delimiter or end of stream arrives.
///
/// An oversized frame is reported once as [`FrameError::FrameTooLarge`]. Its
/// bytes are then dropped up to the next delimiter and reading carries on.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    eof: bool,
    discarding: bool,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            eof: false,
            discarding: false,
            config,
        }
    }

    /// Read the next frame (blocking).
    ///
    /// Returns `Ok(None)` once the stream has ended and every buffered byte
    /// has been returned. A trailing frame without a delimiter is returned
    /// before that.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let max_frame_size = self.config.max_frame_size;
        loop {
            if self.discarding && skip_to_delimiter(&mut self.buf) {
                self.discarding = false;
            }
            if !self.discarding {
                match decode_frame(&mut self.buf, self.eof, max_frame_size) {
                    Ok(Some(frame)) => return Ok(Some(frame)),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::debug!(error = %err, "dropping bytes until next delimiter");
                        self.discarding = true;
                        return Err(err);
                    }
                }
            }
            if self.eof {
                return Ok(None);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                tracing::trace!(buffered = self.buf.len(), "stream reached end");
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Bytes received but not yet returned as a frame.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the delimiter search limit for subsequent reads.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

impl FrameReader<TcpStream> {
    /// Create a frame reader for a TCP stream and apply read timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: FrameConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::command::encode_command;

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(b"GSI,<XML>,\n<ScannerInfo/>\r".to_vec()));
        let frame = reader.read_frame().unwrap().unwrap();

        assert_eq!(frame.as_bytes(), b"GSI,<XML>,\n<ScannerInfo/>");
        assert!(frame.is_terminated());
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn read_multiple_frames() {
        let mut reader = FrameReader::new(Cursor::new(b"one\rtwo\rthree\r".to_vec()));

        let f1 = reader.read_frame().unwrap().unwrap();
        let f2 = reader.read_frame().unwrap().unwrap();
        let f3 = reader.read_frame().unwrap().unwrap();

        assert_eq!(f1.as_bytes(), b"one");
        assert_eq!(f2.as_bytes(), b"two");
        assert_eq!(f3.as_bytes(), b"three");
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn final_frame_without_delimiter() {
        let mut reader = FrameReader::new(Cursor::new(b"done\rtail".to_vec()));

        assert_eq!(reader.read_frame().unwrap().unwrap().as_bytes(), b"done");
        let tail = reader.read_frame().unwrap().unwrap();
        assert_eq!(tail.as_bytes(), b"tail");
        assert!(!tail.is_terminated());
        assert!(reader.read_frame().unwrap().is_none());
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn empty_stream_completes_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn large_frame_spans_many_reads() {
        let mut wire = vec![b'x'; 64 * 1024];
        wire.push(b'\r');

        let mut reader = FrameReader::new(Cursor::new(wire));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.len(), 64 * 1024);
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: b"slow\rframes\r".to_vec(),
            pos: 0,
        };
        let frames: Vec<Frame> = FrameReader::new(byte_reader)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_bytes(), b"slow");
        assert_eq!(frames[1].as_bytes(), b"frames");
    }

    #[test]
    fn oversized_frame_in_stream() {
        let cfg = FrameConfig {
            max_frame_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(vec![b'a'; 1024]), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { max: 16, .. }));
        assert!(reader.read_frame().unwrap().is_none());
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn oversized_frame_resyncs_at_next_delimiter() {
        let mut wire = vec![b'x'; 32];
        wire.push(b'\r');
        wire.extend_from_slice(b"STS,<XML>,\n<ok/>\r");
        let cfg = FrameConfig {
            max_frame_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(ByteByByteReader { bytes: wire, pos: 0 }, cfg);

        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 17, max: 16 }));

        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"STS,<XML>,\n<ok/>");
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn iterator_reports_oversized_frame_once() {
        let mut wire = vec![b'x'; 64];
        wire.extend_from_slice(b"\rPWR\t258\rtail");
        let cfg = FrameConfig {
            max_frame_size: 8,
            ..FrameConfig::default()
        };
        let reader = ByteByByteReader { bytes: wire, pos: 0 };
        let items: Vec<Result<Frame>> = FrameReader::with_config(reader, cfg).collect();

        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Err(FrameError::FrameTooLarge { .. })));
        assert_eq!(items[1].as_ref().unwrap().as_bytes(), b"PWR\t258");
        assert_eq!(items[2].as_ref().unwrap().as_bytes(), b"tail");
    }

    #[test]
    fn encoded_commands_read_back() {
        let mut wire = BytesMut::new();
        encode_command(&["PWR"], &mut wire);
        encode_command(&["VOL", "15"], &mut wire);

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        assert_eq!(reader.read_frame().unwrap().unwrap().as_bytes(), b"PWR\t258");
        assert_eq!(reader.read_frame().unwrap().unwrap().as_bytes(), b"VOL\t15\t361");
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(b"abc".to_vec());
        let mut reader = FrameReader::new(cursor);

        assert!(reader.buffered().is_empty());
        reader.set_max_frame_size(2);
        assert_eq!(reader.config().max_frame_size, 2);
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockThenData {
            state: 0,
            bytes: b"ok\r".to_vec(),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));

        let frame = framed.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"ok");
    }

    struct WouldBlockThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for WouldBlockThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(b"ok\r".to_vec()),
        };
        let mut framed = FrameReader::new(reader);
        let frame = framed.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"ok");
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn roundtrip_over_tcp() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = crate::writer::CommandWriter::new(stream);
            writer.send(&["GSI"]).unwrap();
        });

        let stream = TcpStream::connect(addr).unwrap();
        let cfg = FrameConfig {
            read_timeout: Some(std::time::Duration::from_secs(5)),
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config_tcp(stream, cfg).unwrap();
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"GSI\t236");

        server.join().unwrap();
    }

    #[test]
    fn concurrent_readers_are_independent() {
        let results = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let results = Arc::clone(&results);
                std::thread::spawn(move || {
                    let wire = format!("conn-{i}\rsecond-{i}\r");
                    let reader = FrameReader::new(Cursor::new(wire.into_bytes()));
                    let count = reader.map(|frame| frame.unwrap()).count();
                    results.lock().unwrap().push(count);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*results.lock().unwrap(), vec![2, 2, 2, 2]);
    }
}
