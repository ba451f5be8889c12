//! Embedded display page served to the kiosk browser
//!
//! The page is a single static HTML file compiled into the binary via
//! `RustEmbed`: a black fullscreen stage that polls `/api/current` every
//! second and swaps its `<img>`/`<video>` source only when the asset id
//! changes. The browser is launched once and never restarted: content
//! changes flow through the announcement endpoint, not through process
//! churn.

use rust_embed::RustEmbed;

/// The embedded display page (`assets/index.html`).
#[derive(RustEmbed, Clone)]
#[folder = "assets"]
pub struct DisplayPage;

/// Extension trait wiring the display page onto the local server.
///
/// Lives here rather than in `psgserver` so the generic server crate
/// does not need to know about the signage frontend.
pub trait DisplayPageExt {
    /// Mount the display page at the server root.
    fn add_display_page(&mut self) -> impl std::future::Future<Output = ()> + Send;
}

impl DisplayPageExt for psgserver::Server {
    async fn add_display_page(&mut self) {
        self.add_embedded::<DisplayPage>("/").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_page_is_embedded() {
        let file = DisplayPage::get("index.html").expect("index.html embedded");
        let html = std::str::from_utf8(file.data.as_ref()).unwrap();
        assert!(html.contains("/api/current"));
        assert!(html.contains("setInterval(refresh, 1000)"));
    }
}
