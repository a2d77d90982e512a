use crate::error::{Result, RouterError};

/// Substring marking a consensus-layer port. By deployment convention the
/// Raft side of every shard listens in a reserved 18xxx range while the
/// client-facing HTTP port sits [`PORT_OFFSET`] below it. This is a
/// convention of the cluster layout, not a structural guarantee.
const RAFT_PORT_MARKER: &str = ":18";

/// Fixed offset between a shard's Raft port and its client-facing port.
const PORT_OFFSET: u16 = 10000;

/// Translates a leader address from a shard's config response into the
/// client-facing address requests should be forwarded to.
///
/// Addresses carrying the Raft port marker are rewritten to
/// `host:(port - 10000)`; anything else is assumed to already be
/// client-facing and passes through unchanged. Either way the address must
/// split into exactly one host and one numeric port.
pub fn translate(address: &str) -> Result<String> {
    let mut parts = address.split(':');
    let (host, port) = match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(port), None) if !host.is_empty() => (host, port),
        _ => return Err(RouterError::InvalidAddress(address.to_string())),
    };

    let port: u16 = port
        .parse()
        .map_err(|_| RouterError::InvalidAddress(address.to_string()))?;

    if !address.contains(RAFT_PORT_MARKER) {
        return Ok(address.to_string());
    }

    let client_port = port
        .checked_sub(PORT_OFFSET)
        .ok_or_else(|| RouterError::InvalidAddress(address.to_string()))?;

    Ok(format!("{}:{}", host, client_port))
}
