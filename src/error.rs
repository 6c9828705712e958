/// Error types for the Cookiedough popup

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopupError {
    #[error("No supported browser API found")]
    UnsupportedBrowser,

    #[error("No active tab found")]
    NoActiveTab,

    #[error("Cannot access browser internal pages: {0}")]
    RestrictedUrl(String),

    #[error("Browser API error: {0}")]
    HostApi(String),

    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(String),
}

/// Result type alias for popup operations
pub type Result<T> = std::result::Result<T, PopupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PopupError::UnsupportedBrowser.to_string(),
            "No supported browser API found"
        );
        assert_eq!(
            PopupError::HostApi("cookies API not available".to_string()).to_string(),
            "Browser API error: cookies API not available"
        );
        assert_eq!(
            PopupError::RestrictedUrl("chrome://settings".to_string()).to_string(),
            "Cannot access browser internal pages: chrome://settings"
        );
    }
}
