//! Turns a `Navigate` request from the session into a browser launch.

use client_core::OutputLine;

/// Opens `url` in the system browser unless `use_browser` is off, and
/// returns the lines to append to the log either way.
pub fn navigate(url: &str, use_browser: bool) -> Vec<OutputLine> {
    if !use_browser {
        return vec![OutputLine::comment("// Admin panel: ").link(url, url)];
    }

    match open::that(url) {
        Ok(()) => {
            tracing::info!(%url, "opened admin panel in browser");
            vec![OutputLine::comment("// Opened ").link(url, url)]
        }
        Err(err) => {
            tracing::warn!(%url, "failed to open browser: {err}");
            vec![
                OutputLine::comment("// Could not open a browser."),
                OutputLine::comment("// Visit: ").link(url, url),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_browser_the_url_is_printed() {
        let lines = navigate("http://127.0.0.1:5000/admin", false);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].plain_text(),
            "// Admin panel: http://127.0.0.1:5000/admin"
        );
    }
}
