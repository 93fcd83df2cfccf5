//! Save a resolved artwork URL to disk under a name derived from the app.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Stem used when an app name has no alphanumeric characters at all.
const FALLBACK_STEM: &str = "app";

/// Collapse every run of non-alphanumeric characters to a single `-` and
/// trim leading and trailing separators.
///
/// Alphanumeric is Unicode-aware, so CJK names survive unchanged.
pub fn sanitize_file_stem(app_name: &str) -> String {
    let mut stem = String::with_capacity(app_name.len());
    let mut pending_sep = false;
    for c in app_name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !stem.is_empty() {
                stem.push('-');
            }
            pending_sep = false;
            stem.push(c);
        } else {
            pending_sep = true;
        }
    }
    if stem.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        stem
    }
}

/// File name for a saved icon: sanitized stem plus `suffix`.
pub fn artwork_file_name(app_name: &str, suffix: &str) -> String {
    format!("{}{suffix}", sanitize_file_stem(app_name))
}

/// Fetch `url` and write the body to `dir/<stem><suffix>`.
///
/// The directory is created if needed and an existing file is overwritten.
///
/// # Errors
///
/// Returns [`AppError::Download`] for transport failures, non-success
/// statuses or empty bodies, and [`AppError::Io`] if the file cannot be
/// written.
pub async fn download_artwork(
    client: &reqwest::Client,
    url: &str,
    app_name: &str,
    dir: &Path,
    suffix: &str,
) -> Result<PathBuf> {
    let parsed = url::Url::parse(url)
        .map_err(|e| AppError::Download(format!("invalid artwork URL {url}: {e}")))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| AppError::Download(format!("request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::Download(format!(
            "artwork fetch returned HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Download(format!("cannot read artwork body: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::Download("artwork body was empty".into()));
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(artwork_file_name(app_name, suffix));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "artwork saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn sanitize_collapses_runs_and_trims() {
        assert_eq!(sanitize_file_stem("Spotify - Music and Podcasts"), "Spotify-Music-and-Podcasts");
        assert_eq!(sanitize_file_stem("  Disney+  "), "Disney");
        assert_eq!(sanitize_file_stem("Booking.com: Hotels & Travel"), "Booking-com-Hotels-Travel");
    }

    #[test]
    fn sanitize_keeps_cjk() {
        assert_eq!(sanitize_file_stem("微信 WeChat"), "微信-WeChat");
    }

    #[test]
    fn sanitize_falls_back_when_nothing_left() {
        assert_eq!(sanitize_file_stem("!!! ???"), "app");
        assert_eq!(sanitize_file_stem(""), "app");
    }

    #[test]
    fn file_name_has_suffix() {
        assert_eq!(artwork_file_name("Zoom", "-icon.png"), "Zoom-icon.png");
    }

    #[tokio::test]
    async fn downloads_into_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/art/512x512bb.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("icons");
        let url = format!("{}/art/512x512bb.jpg", server.uri());

        let saved = download_artwork(&reqwest::Client::new(), &url, "Google Maps", &target, "-icon.png")
            .await
            .unwrap();

        assert_eq!(saved, target.join("Google-Maps-icon.png"));
        assert_eq!(std::fs::read(&saved).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn error_status_is_reported_and_nothing_written() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/missing.jpg", server.uri());
        let err = download_artwork(&reqwest::Client::new(), &url, "Zoom", dir.path(), "-icon.png")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Download(_)));
        assert!(err.to_string().contains("404"));
        assert!(!dir.path().join("Zoom-icon.png").exists());
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_artwork(&reqwest::Client::new(), "not a url", "Zoom", dir.path(), "-icon.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Download(_)));
    }
}
