// src/utils/debug.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::site::models::Tutorial;
use crate::utils::error::StorageError;

pub const DEBUG_DIR: &str = "debug";

/// Saves the raw page and the extracted tutorial under `<dir>/debug/`.
/// Returns the debug directory.
pub fn save_debug_snapshot(dir: &Path, html: &str, tutorial: &Tutorial) -> Result<PathBuf, StorageError> {
    let debug_dir = dir.join(DEBUG_DIR);
    fs::create_dir_all(&debug_dir)?;

    let page_path = debug_dir.join("page.html");
    fs::write(&page_path, html)?;
    tracing::info!("Saved raw page to {}", page_path.display());

    let snapshot = serde_json::json!({
        "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        "block_count": tutorial.content.len(),
        "image_count": tutorial.images.len(),
        "tutorial": tutorial,
    });
    let snapshot_str = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    let snapshot_path = debug_dir.join("tutorial.json");
    fs::write(&snapshot_path, snapshot_str)?;
    tracing::info!("Saved extracted tutorial to {}", snapshot_path.display());

    Ok(debug_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::models::ContentBlock;

    #[test]
    fn test_snapshot_contains_page_and_model() {
        let tmp = tempfile::tempdir().unwrap();
        let tutorial = Tutorial {
            url: "http://example.com/1".into(),
            title: "Demo".into(),
            content: vec![ContentBlock::Header { text: "Intro".into() }],
            images: vec!["/a/b.png".into()],
            directory: None,
        };

        let debug_dir = save_debug_snapshot(tmp.path(), "<html></html>", &tutorial).unwrap();
        assert_eq!(debug_dir, tmp.path().join("debug"));
        assert_eq!(fs::read_to_string(debug_dir.join("page.html")).unwrap(), "<html></html>");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(debug_dir.join("tutorial.json")).unwrap()).unwrap();
        assert_eq!(json["block_count"], 1);
        assert_eq!(json["tutorial"]["title"], "Demo");
        assert_eq!(json["tutorial"]["content"][0]["type"], "header");
    }
}
