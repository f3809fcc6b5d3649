//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener, classifying "port in use" separately
//! - Warn when the entry document is missing
//! - Announce the local and LAN URLs
//!
//! # Design Decisions
//! - Fail fast: any bind error is fatal
//! - Diagnostics are informational only; nothing depends on them

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::net::{TcpListener, UdpSocket};

use crate::config::{RelayConfig, StaticConfig};

/// Fatal startup failures.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("port {0} is already in use; stop the other program or change listener.bind_address")]
    PortInUse(u16),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Bind the relay's TCP listener.
pub async fn bind_listener(bind_address: &str) -> Result<TcpListener, StartupError> {
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| StartupError::InvalidAddress(bind_address.to_string()))?;

    TcpListener::bind(addr).await.map_err(|source| {
        if source.kind() == io::ErrorKind::AddrInUse {
            StartupError::PortInUse(addr.port())
        } else {
            StartupError::Bind { addr, source }
        }
    })
}

/// Returns whether the entry document exists, warning when it does not.
pub fn check_entry_document(config: &StaticConfig) -> bool {
    let path = config.index_path();
    let present = path.is_file();
    if !present {
        tracing::warn!(path = %path.display(), "Entry document not found; '/' will return 404");
    }
    present
}

/// Address other machines on the LAN can reach this host at.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface.
pub async fn lan_address() -> IpAddr {
    async fn probe() -> io::Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect("8.8.8.8:80").await?;
        Ok(socket.local_addr()?.ip())
    }

    probe().await.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Log where the relay can be reached.
pub async fn announce(local_addr: SocketAddr, config: &RelayConfig) {
    let port = local_addr.port();
    let lan = lan_address().await;

    tracing::info!(url = %format!("http://localhost:{}", port), "Local access");
    tracing::info!(url = %format!("http://{}:{}", lan, port), "LAN access");
    tracing::info!(
        prefix = %config.upstream.path_prefix,
        origin = %config.upstream.origin,
        root = %config.static_files.root.display(),
        "Relaying stream requests; press Ctrl+C to stop"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn second_bind_reports_port_in_use() {
        let first = bind_listener("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().unwrap();

        match bind_listener(&addr.to_string()).await {
            Err(StartupError::PortInUse(port)) => assert_eq!(port, addr.port()),
            other => panic!("expected PortInUse, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn garbage_address_is_rejected() {
        assert!(matches!(
            bind_listener("localhost").await,
            Err(StartupError::InvalidAddress(_))
        ));
    }

    #[test]
    fn entry_document_presence() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticConfig {
            root: dir.path().to_path_buf(),
            index: "index.html".into(),
        };
        assert!(!check_entry_document(&config));

        std::fs::write(dir.path().join("index.html"), "x").unwrap();
        assert!(check_entry_document(&config));

        let missing_root = StaticConfig {
            root: PathBuf::from("/definitely/not/here"),
            index: "index.html".into(),
        };
        assert!(!check_entry_document(&missing_root));
    }
}
