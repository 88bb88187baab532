//! Signaling client configuration.

/// Configuration handed to the driver when it initializes the signaling
/// client.
///
/// The session layer opens no network ports itself; peer discovery and NAT
/// traversal are delegated to the broker and the listed STUN-class servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingConfig {
    /// NAT-traversal helper endpoints, in `stun:host:port` form.
    pub ice_servers: Vec<String>,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![
                "stun:stun.l.google.com:19302".to_string(),
                "stun:stun1.l.google.com:19302".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lists_stun_servers() {
        let config = SignalingConfig::default();
        assert!(!config.ice_servers.is_empty());
        assert!(config.ice_servers.iter().all(|s| s.starts_with("stun:")));
    }
}
