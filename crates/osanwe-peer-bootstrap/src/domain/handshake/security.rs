//! Greeting validation (security-critical).
//!
//! SECURITY-CRITICAL: decides what the acceptor believes about a caller.

use std::net::{IpAddr, SocketAddr};

use super::config::HandshakeConfig;
use super::types::{GreetingRequest, GreetingResponse};
use crate::domain::RejectReason;

/// Check a decoded request against our configuration.
pub fn validate_greeting(
    request: &GreetingRequest,
    config: &HandshakeConfig,
) -> Result<(), RejectReason> {
    if request.version < config.min_protocol_version {
        return Err(RejectReason::UnsupportedVersion {
            theirs: request.version,
            min: config.min_protocol_version,
        });
    }
    Ok(())
}

/// Build the reflection answer for a caller seen at `source`.
///
/// # Security
/// `source` must be the transport's peer address. The address in the
/// response is taken from it; the request only contributes its port.
pub fn build_response(
    request: &GreetingRequest,
    source: SocketAddr,
) -> Result<GreetingResponse, RejectReason> {
    let observed_address = match source.ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(ip) => ip.to_ipv4_mapped().ok_or(RejectReason::NonIpv4Source)?,
    };

    Ok(GreetingResponse {
        observed_address,
        observed_port: request.port,
        visible: true,
    })
}
