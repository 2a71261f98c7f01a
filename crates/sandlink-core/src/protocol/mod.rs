//! SandNet-style wire protocol.
//!
//! Only the advertisement datagram is implemented here: the fixed-size
//! presence announcement a node broadcasts so peers can discover it. Data
//! traffic uses a separate port and is out of this crate's hands.

use crate::error::ProtocolError;

/// UDP port advertisements and other control traffic use.
pub const CONTROL_PORT: u16 = 37895;

/// UDP port for channel data traffic.
pub const DATA_PORT: u16 = 37900;

/// Opcode of an advertisement datagram (big-endian on the wire).
pub const OPCODE_ADVERTISEMENT: u16 = 0x0100;

/// Wire protocol version emitted and accepted by this crate.
pub const PROTOCOL_VERSION: u8 = 1;

/// Fixed length of the node name field, zero-padded.
pub const NODE_NAME_LEN: usize = 32;

/// Total advertisement datagram length:
/// opcode (2) + version (1) + mac (6) + input ports (1) + output ports (1) + name.
pub const ADVERTISEMENT_LEN: usize = 11 + NODE_NAME_LEN;

/// One presence advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementPacket {
    pub mac: [u8; 6],
    pub name: String,
    pub input_ports: u8,
    pub output_ports: u8,
}

impl AdvertisementPacket {
    /// Encode to the fixed wire layout. Names longer than the name field are
    /// truncated at a character boundary.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ADVERTISEMENT_LEN);
        buf.extend_from_slice(&OPCODE_ADVERTISEMENT.to_be_bytes());
        buf.push(PROTOCOL_VERSION);
        buf.extend_from_slice(&self.mac);
        buf.push(self.input_ports);
        buf.push(self.output_ports);

        let mut end = self.name.len().min(NODE_NAME_LEN);
        while !self.name.is_char_boundary(end) {
            end -= 1;
        }
        buf.extend_from_slice(&self.name.as_bytes()[..end]);
        buf.resize(ADVERTISEMENT_LEN, 0);

        buf
    }

    /// Decode an advertisement datagram.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < ADVERTISEMENT_LEN {
            return Err(ProtocolError::TooShort {
                len: buf.len(),
                expected: ADVERTISEMENT_LEN,
            });
        }

        let opcode = u16::from_be_bytes([buf[0], buf[1]]);
        if opcode != OPCODE_ADVERTISEMENT {
            return Err(ProtocolError::UnexpectedOpcode(opcode));
        }

        let version = buf[2];
        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::UnsupportedVersion(version));
        }

        let mut mac = [0u8; 6];
        mac.copy_from_slice(&buf[3..9]);

        let input_ports = buf[9];
        let output_ports = buf[10];

        let name_field = &buf[11..ADVERTISEMENT_LEN];
        let name_end = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NODE_NAME_LEN);
        let name = String::from_utf8_lossy(&name_field[..name_end]).into_owned();

        Ok(Self {
            mac,
            name,
            input_ports,
            output_ports,
        })
    }
}
