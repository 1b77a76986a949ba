//! # Printer Transport Layer
//!
//! Delivery of a finished command buffer to a device. The pipeline
//! treats transports as opaque collaborators: they accept bytes and
//! report success or failure, nothing more. No queuing, no retry.
//!
//! ## Available Transports
//!
//! - [`tcp`]: raw TCP printing (port 9100), the de-facto standard for
//!   networked ESC/POS printers

pub mod tcp;

pub use tcp::TcpTransport;

use crate::error::TirillaError;

/// A delivery mechanism for print data.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send a complete command buffer to the printer.
    async fn send(&self, data: &[u8]) -> Result<(), TirillaError>;

    /// Check whether the printer is reachable.
    async fn is_online(&self) -> bool;
}
