//! Screenshot capture.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{BrowsingContextCommand, Command};

use super::Tab;

// ============================================================================
// Types
// ============================================================================

/// Image format for screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format with quality (0-100).
    Jpeg(u8),
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg(_) => "image/jpeg",
        }
    }

    /// Returns the format string for the protocol.
    fn format_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg(_) => "jpeg",
        }
    }

    /// Returns the quality value if JPEG.
    fn quality(&self) -> Option<u8> {
        match self {
            Self::Png => None,
            Self::Jpeg(q) => Some((*q).min(100)),
        }
    }
}

// ============================================================================
// Tab - Screenshot
// ============================================================================

impl Tab {
    /// Captures the visible area of this tab and returns the encoded bytes.
    ///
    /// Uses the browser's `captureVisibleTab`, so the tab must be in front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response carries no decodable data.
    pub async fn capture_screenshot(&self, format: ImageFormat) -> Result<Vec<u8>> {
        debug!(tab_id = %self.inner.tab_id, ?format, "Capturing screenshot");

        let command = Command::BrowsingContext(BrowsingContextCommand::CaptureScreenshot {
            format: format.format_str().to_string(),
            quality: format.quality(),
        });

        let response = self.send_command(command).await?;

        let data = response
            .get_str("data")
            .ok_or_else(|| Error::protocol("Screenshot response missing data field"))?;

        decode_image_data(data)
    }
}

/// Decodes base64 image data, tolerating a `data:` URL prefix.
fn decode_image_data(data: &str) -> Result<Vec<u8>> {
    let payload = match data.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => data,
    };

    Base64Standard
        .decode(payload)
        .map_err(|e| Error::protocol(format!("Failed to decode screenshot: {e}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_image_data("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_image_data("data:image/png;base64,aGk=").unwrap(), b"hi");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_image_data("not base64!"),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn test_format_quality() {
        assert_eq!(ImageFormat::Png.quality(), None);
        assert_eq!(ImageFormat::Jpeg(150).quality(), Some(100));
        assert_eq!(ImageFormat::default().mime_type(), "image/png");
    }
}
