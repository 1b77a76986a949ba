//! # Raw TCP Transport
//!
//! Most networked ESC/POS printers accept raw print data on TCP port
//! 9100 ("JetDirect" style): open a socket, write the buffer, close.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, warn};

use super::Transport;
use crate::error::TirillaError;

/// Default raw-printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// Network printer reachable over raw TCP.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpTransport {
    /// Create a transport for `host:port`.
    pub fn new(host: &str, port: u16) -> Result<Self, TirillaError> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create a transport from an address string, e.g.
    /// `"192.168.1.50:9100"`.
    pub fn from_addr(addr: &str) -> Result<Self, TirillaError> {
        let addr = addr
            .parse()
            .map_err(|_| TirillaError::Transport(format!("Invalid printer address: {}", addr)))?;
        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Override the connection timeout (default 5s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The printer's socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for TcpTransport {
    async fn send(&self, data: &[u8]) -> Result<(), TirillaError> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| TirillaError::Transport(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| TirillaError::Transport(format!("{}: {}", self.addr, e)))?;

        info!(addr = %self.addr, bytes = data.len(), "sending print job");
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn is_online(&self) -> bool {
        let probe_timeout = Duration::from_millis(500);
        match tokio::time::timeout(probe_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(addr = %self.addr, error = %e, "printer unreachable");
                false
            }
            Err(_) => {
                warn!(addr = %self.addr, "printer probe timed out");
                false
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
