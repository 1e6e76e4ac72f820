use bytes::{Buf, Bytes, BytesMut};
use log::debug;

use crate::errors::Result;
use crate::packet::PacketHeader;
use crate::parsing::BufParsing;
use crate::types::PacketLength;

/// A packet as it appears on the wire, with partial body chunks joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub header: PacketHeader,
    pub body: Bytes,
}

/// Reads a single packet.
pub fn read_packet<B: Buf>(i: &mut B) -> Result<RawPacket> {
    let header = PacketHeader::from_buf(i)?;
    let body = match header.packet_length() {
        PacketLength::Fixed(len) => {
            let len = len as usize;
            crate::ensure_packet!(
                i.remaining() >= len,
                "{:?} packet truncated, {} of {} bytes",
                header.tag(),
                i.remaining(),
                len
            );
            i.read_take(len)?
        }
        PacketLength::Indeterminate => i.rest(),
        PacketLength::Partial(len) => read_partial_body(i, len)?,
    };

    Ok(RawPacket { header, body })
}

fn read_partial_body<B: Buf>(i: &mut B, first: u32) -> Result<Bytes> {
    let mut body = BytesMut::new();
    let mut chunk = first;
    loop {
        body.extend_from_slice(&i.read_take(chunk as usize)?);
        match PacketLength::from_buf(i)? {
            PacketLength::Partial(next) => chunk = next,
            PacketLength::Fixed(last) => {
                body.extend_from_slice(&i.read_take(last as usize)?);
                break;
            }
            PacketLength::Indeterminate => {
                crate::bail_malformed!("indeterminate length inside a partial body")
            }
        }
    }

    Ok(body.freeze())
}

/// Iterates over the packets of a decoded binary stream.
///
/// Stops after the first error, which is returned as the last item.
#[derive(Debug)]
pub struct PacketParser {
    input: Bytes,
    failed: bool,
}

impl PacketParser {
    pub fn new(input: Bytes) -> Self {
        PacketParser {
            input,
            failed: false,
        }
    }
}

impl Iterator for PacketParser {
    type Item = Result<RawPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.input.has_remaining() {
            return None;
        }

        match read_packet(&mut self.input) {
            Ok(packet) => {
                debug!(
                    "parsed {:?} packet, {} bytes",
                    packet.header.tag(),
                    packet.body.len()
                );
                Some(Ok(packet))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
