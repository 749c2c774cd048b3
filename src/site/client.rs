// src/site/client.rs
use crate::utils::error::SiteError;
use reqwest::{header, Url};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

pub const DEFAULT_BASE_URL: &str = "http://thelegendofrandom.com/blog/archives";
pub const DEFAULT_ARCHIVE_HOST: &str = "https://web.archive.org";

const USER_AGENT: &str = concat!("tutorial_ripper/", env!("CARGO_PKG_VERSION"));
// Images are written to disk in blocks of this size
const DOWNLOAD_CHUNK_SIZE: usize = 1024;

/// Creates a reqwest client shared by page and image requests.
pub fn build_client() -> Result<reqwest::Client, SiteError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Resolves the CLI target: a numeric id is appended to `base_url`,
/// anything else must already be an absolute URL.
pub fn tutorial_url(target: &str, base_url: &str) -> Result<String, SiteError> {
    let target = target.trim();
    if let Ok(id) = target.parse::<u64>() {
        return Ok(format!("{}/{}", base_url.trim_end_matches('/'), id));
    }

    Url::parse(target).map_err(|e| SiteError::InvalidUrl(format!("{} ({})", target, e)))?;
    Ok(target.to_string())
}

/// Rewrites an image URL so it is served by the archive mirror.
/// Pages come from the archive, so their images are root-relative
/// (`/web/<timestamp>/http://...`); absolute URLs are left unchanged.
pub fn archive_url(url: &str, archive_host: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{}", archive_host.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

/// Downloads the tutorial page body.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, SiteError> {
    tracing::info!("Downloading tutorial from: {}", url);

    let response = client.get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(SiteError::Http(status, url.to_string()));
    }

    let body = response.text().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

/// Streams a single file to `filepath`.
pub async fn download_file(client: &reqwest::Client, url: &str, filepath: &Path) -> Result<u64, SiteError> {
    tracing::info!("Downloading {} to {}", url, filepath.display());

    let mut response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(SiteError::Http(status, url.to_string()));
    }

    let file = tokio::fs::File::create(filepath).await?;
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        if chunk.is_empty() {
            continue;
        }
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;

    tracing::debug!("Wrote {} bytes to {}", written, filepath.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_url_from_id() {
        assert_eq!(
            tutorial_url("1234", DEFAULT_BASE_URL).unwrap(),
            "http://thelegendofrandom.com/blog/archives/1234"
        );
        assert_eq!(tutorial_url(" 7 ", "http://example.com/a/").unwrap(), "http://example.com/a/7");
    }

    #[test]
    fn test_tutorial_url_passthrough() {
        let url = "https://web.archive.org/web/2013/http://thelegendofrandom.com/blog/archives/1234";
        assert_eq!(tutorial_url(url, DEFAULT_BASE_URL).unwrap(), url);
    }

    #[test]
    fn test_tutorial_url_rejects_garbage() {
        let err = tutorial_url("not a url", DEFAULT_BASE_URL).unwrap_err();
        assert!(matches!(err, SiteError::InvalidUrl(_)));
    }

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url("/web/2013im_/http://x.com/img/a.png", DEFAULT_ARCHIVE_HOST),
            "https://web.archive.org/web/2013im_/http://x.com/img/a.png"
        );
        assert_eq!(archive_url("/p.png", "http://mirror.local/"), "http://mirror.local/p.png");
        assert_eq!(archive_url("http://x.com/a.png", DEFAULT_ARCHIVE_HOST), "http://x.com/a.png");
        assert_eq!(archive_url("//cdn.x.com/a.png", DEFAULT_ARCHIVE_HOST), "//cdn.x.com/a.png");
    }
}
