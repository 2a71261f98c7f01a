//! SandNet protocol node.
//!
//! A node is one UDP endpoint on the lighting network: it owns the socket
//! bound to the configured interface and emits the presence advertisements
//! peer nodes use to discover it.
//!
//! Uses SO_REUSEADDR (and SO_REUSEPORT on unix) so several nodes can coexist
//! on one machine.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use crate::error::NodeError;
use crate::protocol::{AdvertisementPacket, CONTROL_PORT};

/// Options for binding a node.
#[derive(Debug, Clone)]
pub struct NodeOptions {
    /// Interface address the socket binds to.
    pub interface_ip: Ipv4Addr,
    /// Name carried in advertisements.
    pub name: String,
    /// Input port count carried in advertisements.
    pub input_ports: u8,
    /// Advertisement destination. Defaults to limited broadcast on the
    /// control port.
    pub advert_target: Option<SocketAddr>,
}

/// One live endpoint on the SandNet network.
pub struct SandNetNode {
    socket: UdpSocket,
    interface_ip: Ipv4Addr,
    name: String,
    mac: [u8; 6],
    input_ports: u8,
    advert_target: SocketAddr,
}

impl SandNetNode {
    /// Bind a node to the given interface.
    pub fn bind(options: NodeOptions) -> Result<Self, NodeError> {
        let socket = create_node_socket(options.interface_ip).map_err(|e| NodeError::Bind {
            ip: options.interface_ip.to_string(),
            source: e,
        })?;

        let advert_target = options.advert_target.unwrap_or_else(|| {
            SocketAddr::from(SocketAddrV4::new(Ipv4Addr::BROADCAST, CONTROL_PORT))
        });

        debug!(ip = %options.interface_ip, target = %advert_target, "node bound");

        Ok(Self {
            socket,
            interface_ip: options.interface_ip,
            mac: derive_mac(options.interface_ip),
            name: options.name,
            input_ports: options.input_ports,
            advert_target,
        })
    }

    /// Emit one presence advertisement. Returns the number of bytes sent.
    pub fn send_advertisement(&self) -> Result<usize, NodeError> {
        let packet = AdvertisementPacket {
            mac: self.mac,
            name: self.name.clone(),
            input_ports: self.input_ports,
            output_ports: 0,
        };

        let sent = self
            .socket
            .send_to(&packet.encode(), self.advert_target)
            .map_err(|e| NodeError::Send {
                target: self.advert_target.to_string(),
                source: e,
            })?;

        debug!(target = %self.advert_target, bytes = sent, "advertisement sent");

        Ok(sent)
    }

    /// Interface address the node is bound to.
    pub fn interface_ip(&self) -> Ipv4Addr {
        self.interface_ip
    }

    /// Local socket address (ephemeral port chosen at bind time).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Name carried in advertisements.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node MAC identity.
    pub fn mac(&self) -> [u8; 6] {
        self.mac
    }
}

/// Create a broadcast-capable UDP socket bound to `ip` on an ephemeral port.
fn create_node_socket(ip: Ipv4Addr) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    socket.set_broadcast(true)?;

    let addr = SocketAddr::from(SocketAddrV4::new(ip, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Derive a stable, locally-administered MAC from the interface address.
///
/// `02` marks the address as locally administered; `53 4e` is the protocol
/// tag; the tail is the low three octets of the interface IP.
fn derive_mac(ip: Ipv4Addr) -> [u8; 6] {
    let octets = ip.octets();
    [0x02, 0x53, 0x4e, octets[1], octets[2], octets[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn loopback_listener() -> (UdpSocket, SocketAddr) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let addr = socket.local_addr().unwrap();
        (socket, addr)
    }

    fn loopback_node(target: SocketAddr) -> SandNetNode {
        SandNetNode::bind(NodeOptions {
            interface_ip: Ipv4Addr::LOCALHOST,
            name: "test-node".to_string(),
            input_ports: 8,
            advert_target: Some(target),
        })
        .unwrap()
    }

    #[test]
    fn test_bind_and_accessors() {
        let (_listener, target) = loopback_listener();
        let node = loopback_node(target);

        assert_eq!(node.interface_ip(), Ipv4Addr::LOCALHOST);
        assert_eq!(node.name(), "test-node");
        assert_eq!(node.mac(), [0x02, 0x53, 0x4e, 0, 0, 1]);
        assert_ne!(node.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_send_advertisement_reaches_target() {
        let (listener, target) = loopback_listener();
        let node = loopback_node(target);

        let sent = node.send_advertisement().unwrap();
        assert_eq!(sent, crate::protocol::ADVERTISEMENT_LEN);

        let mut buf = [0u8; 64];
        let (len, _) = listener.recv_from(&mut buf).unwrap();

        let packet = AdvertisementPacket::decode(&buf[..len]).unwrap();
        assert_eq!(packet.name, "test-node");
        assert_eq!(packet.input_ports, 8);
        assert_eq!(packet.output_ports, 0);
        assert_eq!(packet.mac, node.mac());
    }

    #[test]
    fn test_bind_unroutable_ip_fails() {
        // TEST-NET-3 address, not assigned to any local interface.
        let result = SandNetNode::bind(NodeOptions {
            interface_ip: Ipv4Addr::new(203, 0, 113, 1),
            name: "nope".to_string(),
            input_ports: 8,
            advert_target: None,
        });

        assert!(matches!(result, Err(NodeError::Bind { .. })));
    }

    #[test]
    fn test_derive_mac_is_stable() {
        let ip = Ipv4Addr::new(192, 168, 1, 50);
        assert_eq!(derive_mac(ip), derive_mac(ip));
        assert_eq!(derive_mac(ip)[0] & 0x02, 0x02);
    }
}
