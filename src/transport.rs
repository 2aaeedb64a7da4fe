/*!
Transport collaborator for the QKD protocol.

The protocol core never touches a socket directly. Everything that crosses
the classical channel goes through the [`Transport`] trait: a blocking
`send` and a blocking `recv` that may return fewer bytes than requested,
exactly the guarantees a stream socket gives. On top of that, this module
provides the length-prefixed framing the protocol messages ride on, so
message boundaries survive TCP segmentation.

[`duplex`] returns a connected in-memory pair for tests and in-process
negotiations.
*/

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::mpsc::{Receiver, Sender, channel};

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};

use crate::constants::MAX_FRAME_LEN;
use crate::error::{Error, Result, format_err};

/// Blocking byte-stream transport
pub trait Transport {
    /// Send all of `data`, blocking until it is written
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive up to `max_len` bytes, blocking for at least one.
    ///
    /// An empty return means the peer closed the stream.
    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>>;
}

impl Transport for TcpStream {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data)?;
        Ok(())
    }

    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_len];
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// One end of an in-memory byte-stream pair
pub struct MemoryTransport {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    /// Bytes received but not yet handed to the caller
    pending: Vec<u8>,
}

/// Create a connected pair of in-memory transports.
///
/// Each end behaves like a stream socket: writes are buffered without
/// blocking, reads block until bytes are available and may return fewer
/// than requested. Dropping one end makes the other's operations fail.
pub fn duplex() -> (MemoryTransport, MemoryTransport) {
    let (a_tx, b_rx) = channel();
    let (b_tx, a_rx) = channel();
    (
        MemoryTransport { tx: a_tx, rx: a_rx, pending: Vec::new() },
        MemoryTransport { tx: b_tx, rx: b_rx, pending: Vec::new() },
    )
}

impl Transport for MemoryTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed")))
    }

    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>> {
        if self.pending.is_empty() {
            match self.rx.recv() {
                Ok(chunk) => self.pending = chunk,
                Err(_) => return Ok(Vec::new()),
            }
        }
        let take = self.pending.len().min(max_len);
        let rest = self.pending.split_off(take);
        let out = std::mem::replace(&mut self.pending, rest);
        Ok(out)
    }
}

/// Read exactly `len` bytes, looping over short reads
fn recv_exact<T: Transport + ?Sized>(transport: &mut T, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    while buf.len() < len {
        let chunk = transport.recv(len - buf.len())?;
        if chunk.is_empty() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed mid-message",
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Send one length-prefixed frame
pub(crate) fn send_frame<T: Transport + ?Sized>(transport: &mut T, payload: &[u8]) -> Result<()> {
    debug_assert!(payload.len() <= MAX_FRAME_LEN);
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32(payload.len() as u32);
    frame.put_slice(payload);
    transport.send(&frame)
}

/// Receive one length-prefixed frame
pub(crate) fn recv_frame<T: Transport + ?Sized>(transport: &mut T) -> Result<Vec<u8>> {
    let header = recv_exact(transport, 4)?;
    let len = BigEndian::read_u32(&header) as usize;
    if len > MAX_FRAME_LEN {
        return format_err(format!("frame of {} bytes exceeds limit", len));
    }
    recv_exact(transport, len)
}
