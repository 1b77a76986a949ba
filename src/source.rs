//! # Image Sources
//!
//! Loading and scaling of logo images, abstracted behind the
//! [`ImageSource`] capability so the raster encoder's classification and
//! dithering logic never touches HTTP or codec concerns.
//!
//! [`HttpImageSource`] is the production implementation: it fetches a
//! URL with reqwest and decodes with the `image` crate. Tests substitute
//! their own sources to simulate fixed images or load failures.

use async_trait::async_trait;
use image::{RgbaImage, imageops};
use tracing::debug;

use crate::error::TirillaError;

// ============================================================================
// PIXEL BUFFER
// ============================================================================

/// A decoded image: a width x height grid of RGBA samples, 8 bits per
/// channel.
///
/// Owned transiently for one encoding call and discarded afterwards;
/// nothing is cached between print requests.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from raw RGBA8 data (`width * height * 4` bytes).
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a buffer filled with one RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap a decoded `image` crate buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// The RGBA sample at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

// ============================================================================
// SCALING
// ============================================================================

/// Resampling filter for [`ImageSource::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleFilter {
    /// High-quality resampling (Lanczos3); used for threshold and
    /// dithered raster modes.
    Smooth,
    /// Nearest-neighbor; used by the fast raster mode.
    Nearest,
}

/// Resize an RGBA pixel buffer to exact dimensions.
///
/// Shared by [`HttpImageSource`] and the trait's default `resize`, so
/// test sources only need to implement `load`.
pub fn resize_rgba(image: &PixelBuffer, width: u32, height: u32, filter: ScaleFilter) -> PixelBuffer {
    let raw = RgbaImage::from_raw(image.width, image.height, image.data.clone())
        .expect("PixelBuffer data length matches its dimensions");
    let filter = match filter {
        ScaleFilter::Smooth => imageops::FilterType::Lanczos3,
        ScaleFilter::Nearest => imageops::FilterType::Nearest,
    };
    PixelBuffer::from_rgba(imageops::resize(&raw, width, height, filter))
}

// ============================================================================
// IMAGE SOURCE CAPABILITY
// ============================================================================

/// Capability for loading and scaling logo images.
///
/// `load` is the only suspension point in receipt composition; `resize`
/// is pure CPU work.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch and decode an image resource.
    ///
    /// Failures are [`TirillaError::ImageLoad`]; the receipt composer
    /// treats them as non-fatal and omits the logo.
    async fn load(&self, url: &str) -> Result<PixelBuffer, TirillaError>;

    /// Resize a decoded image to exact dimensions.
    fn resize(&self, image: &PixelBuffer, width: u32, height: u32, filter: ScaleFilter) -> PixelBuffer {
        resize_rgba(image, width, height, filter)
    }
}

/// Image source that fetches URLs over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Create a source with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a source reusing an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn load(&self, url: &str) -> Result<PixelBuffer, TirillaError> {
        debug!(url, "fetching logo image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TirillaError::ImageLoad(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(TirillaError::ImageLoad(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TirillaError::ImageLoad(format!("Failed to read image data: {}", e)))?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| TirillaError::ImageLoad(format!("Failed to decode image: {}", e)))?;

        debug!(width = image.width(), height = image.height(), "logo decoded");
        Ok(PixelBuffer::from_rgba(image.to_rgba8()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
