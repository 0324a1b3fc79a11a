use anyhow::{bail, Context, Result};

use crate::rules::Federation;

/// Open a URL in the user's default browser
///
/// Only http(s) URLs are handed to the browser.
///
/// # Errors
/// Returns error if the URL is not http(s) or the browser cannot be opened
pub fn open_url(url: &str) -> Result<()> {
    if !is_web_url(url) {
        bail!("Refusing to open non-web URL: {}", url);
    }
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Open a federation's rule book.
pub fn open_rules(federation: Federation) -> Result<()> {
    open_url(federation.rules_url())
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
