use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// IPv4 addresses of every local interface, loopback excluded, in interface
/// order.
///
/// When interface enumeration fails or yields nothing usable, falls back to
/// the address the OS would route outbound traffic from. Returns an empty
/// list when neither works; callers fall back to `0.0.0.0`.
pub fn discover_local_ipv4() -> Vec<Ipv4Addr> {
    let enumerated = match if_addrs::get_if_addrs() {
        Ok(interfaces) => usable_ipv4(interfaces.iter().map(|interface| interface.ip())),
        Err(e) => {
            tracing::debug!("[osanwe] Interface enumeration failed: {}", e);
            Vec::new()
        }
    };
    if !enumerated.is_empty() {
        return enumerated;
    }

    match routed_ipv4() {
        Some(ip) => vec![ip],
        None => {
            tracing::debug!("[osanwe] No routable IPv4 interface found");
            Vec::new()
        }
    }
}

/// Keep non-loopback, specified IPv4 addresses, first occurrence wins.
pub(crate) fn usable_ipv4(addresses: impl IntoIterator<Item = IpAddr>) -> Vec<Ipv4Addr> {
    let mut usable = Vec::new();
    for address in addresses {
        if let IpAddr::V4(ip) = address {
            if !ip.is_loopback() && !ip.is_unspecified() && !usable.contains(&ip) {
                usable.push(ip);
            }
        }
    }
    usable
}

/// Connecting a UDP socket sends nothing but makes the OS pick the source
/// address it would route through.
fn routed_ipv4() -> Option<Ipv4Addr> {
    let target = SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 9));
    let local = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
        .and_then(|socket| socket.connect(target).map(|_| socket))
        .and_then(|socket| socket.local_addr())
        .ok()?;

    usable_ipv4([local.ip()]).into_iter().next()
}
