// src/storage/mod.rs
use std::path::{Component, Path, PathBuf};
use crate::site::models::{bare_name, Tutorial, IMAGE_DIR};
use crate::utils::error::StorageError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const README_FILE: &str = "README.md";

static SLUG_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[#:,()]").expect("Failed to compile SLUG_STRIP_RE")
});

static SLUG_SPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile SLUG_SPACE_RE")
});

/// Default folder name for a tutorial, e.g. "Part 1: Intro (OllyDbg)" -> "part_1_intro_ollydbg".
pub fn directory_name(title: &str) -> String {
    let stripped = SLUG_STRIP_RE.replace_all(title, "");
    SLUG_SPACE_RE.replace_all(&stripped, "_").to_lowercase()
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager rooted at `base_dir`. Nothing is created yet.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.as_ref().to_path_buf() }
    }

    /// Path the tutorial would be written to. The title-derived name must be
    /// a single plain path component directly under the base directory.
    pub fn tutorial_dir(&self, tutorial: &Tutorial) -> Result<PathBuf, StorageError> {
        let name = directory_name(&tutorial.title);
        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_dir.join(&name)),
            _ => Err(StorageError::InvalidDirectoryName(name)),
        }
    }

    /// Creates `<dir>` and `<dir>/img`. Returns `Ok(false)` without touching
    /// anything if the path is already taken.
    pub async fn prepare_directory(&self, dir: &Path) -> Result<bool, StorageError> {
        if tokio::fs::try_exists(dir).await? {
            if tokio::fs::metadata(dir).await?.is_dir() {
                tracing::warn!("Directory already exists at {}", dir.display());
            } else {
                tracing::warn!("Non-directory file already exists at {}", dir.display());
            }
            return Ok(false);
        }

        // Only the base may be created on the way; the tutorial folder itself must be new
        tokio::fs::create_dir_all(&self.base_dir).await?;
        tokio::fs::create_dir(dir).await?;
        tokio::fs::create_dir(dir.join(IMAGE_DIR)).await?;
        tracing::debug!("Created output directory {}", dir.display());
        Ok(true)
    }

    /// Writes the Markdown into `<dir>/README.md`.
    pub async fn write_markdown(&self, dir: &Path, markdown: &str) -> Result<PathBuf, StorageError> {
        let file_path = dir.join(README_FILE);
        tokio::fs::write(&file_path, markdown).await?;

        tracing::info!("Saved markdown to {}", file_path.display());
        Ok(file_path)
    }

    /// Local destination of a downloaded image: `<dir>/img/<file name>`.
    pub fn image_path(&self, dir: &Path, url: &str) -> PathBuf {
        dir.join(IMAGE_DIR).join(bare_name(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name("R4ndom's Tutorial #1: Intro (Part 1), OK"), "r4ndom's_tutorial_1_intro_part_1_ok");
        assert_eq!(directory_name("Demo"), "demo");
        assert_eq!(directory_name("  lots \t of\n\nspace "), "_lots_of_space_");
    }

    #[test]
    fn test_directory_name_never_has_stripped_chars_or_runs() {
        let titles = [
            "#1: (a) , b",
            "Tutorial  ##  (  ) spaces",
            "a\t\t\tb",
            "::,,(())##",
            "Mixed CASE : Title",
        ];
        for title in titles {
            let slug = directory_name(title);
            assert!(!slug.contains(|c: char| "#:,()".contains(c)), "{} -> {}", title, slug);
            assert!(!slug.contains(char::is_whitespace), "{} -> {}", title, slug);
            assert_eq!(slug, slug.to_lowercase());
        }
        // Whitespace runs collapse to a single underscore
        assert_eq!(directory_name("a \t\n b"), "a_b");
    }

    #[test]
    fn test_prepare_creates_dir_and_img() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path());
        let tutorial = Tutorial { title: "Part 1: Intro".into(), ..Default::default() };
        let dir = storage.tutorial_dir(&tutorial).unwrap();
        assert_eq!(dir, tmp.path().join("part_1_intro"));

        assert!(block_on(storage.prepare_directory(&dir)).unwrap());
        assert!(dir.join("img").is_dir());

        let readme = block_on(storage.write_markdown(&dir, "Demo\n====\n")).unwrap();
        assert_eq!(readme, dir.join("README.md"));
        assert_eq!(std::fs::read_to_string(readme).unwrap(), "Demo\n====\n");
    }

    #[test]
    fn test_prepare_skips_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path());
        let dir = tmp.path().join("demo");
        std::fs::create_dir(&dir).unwrap();

        assert!(!block_on(storage.prepare_directory(&dir)).unwrap());
        // Nothing was written into it
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_skips_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path());
        let path = tmp.path().join("demo");
        std::fs::write(&path, "taken").unwrap();

        assert!(!block_on(storage.prepare_directory(&path)).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "taken");
    }

    #[test]
    fn test_tutorial_dir_rejects_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path());
        for title in ["TCP/IP Basics", "..", "../escape", ".", ""] {
            let tutorial = Tutorial { title: title.into(), ..Default::default() };
            let err = storage.tutorial_dir(&tutorial).unwrap_err();
            assert!(matches!(err, StorageError::InvalidDirectoryName(_)), "{:?} -> {:?}", title, err);
        }
        // Dots inside a name are fine
        let tutorial = Tutorial { title: "v1.2 notes".into(), ..Default::default() };
        assert_eq!(storage.tutorial_dir(&tutorial).unwrap(), tmp.path().join("v1.2_notes"));
    }

    #[test]
    fn test_prepare_does_not_create_intermediate_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path());
        let nested = tmp.path().join("tcp").join("ip_basics");

        assert!(block_on(storage.prepare_directory(&nested)).is_err());
        assert!(!tmp.path().join("tcp").exists());
    }

    #[test]
    fn test_prepare_creates_missing_base() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("out");
        let storage = StorageManager::new(&base);
        let dir = base.join("demo");

        assert!(block_on(storage.prepare_directory(&dir)).unwrap());
        assert!(dir.join("img").is_dir());
    }

    #[test]
    fn test_image_path() {
        let storage = StorageManager::new(".");
        let dir = Path::new("demo");
        assert_eq!(
            storage.image_path(dir, "/web/1/http://x.com/up/shot.png"),
            Path::new("demo").join("img").join("shot.png")
        );
    }
}
