pub mod container;
pub mod materialize;

pub use container::{extract_container, ExtractContext};

use crate::error::{DecompError, Result};
use std::path::Path;

/// Make room for a fresh output tree. Refuses to clobber an existing
/// directory unless overwriting was requested; never creates the root
/// itself (the extractor does that only after the container magic checks
/// out).
pub async fn prepare_output_root(path: &Path, force_overwrite: bool) -> Result<()> {
    if tokio::fs::try_exists(path).await? {
        if !force_overwrite {
            return Err(DecompError::OutputDirectoryExists {
                path: path.display().to_string(),
            });
        }
        tokio::fs::remove_dir_all(path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_refuses_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        std::fs::create_dir(&root).unwrap();

        let result = prepare_output_root(&root, false).await;
        assert!(matches!(
            result,
            Err(DecompError::OutputDirectoryExists { .. })
        ));
        assert!(root.exists());
    }

    #[tokio::test]
    async fn test_prepare_with_force_removes_stale_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        std::fs::create_dir_all(root.join("stale")).unwrap();
        std::fs::write(root.join("stale/old.yml"), "old").unwrap();

        prepare_output_root(&root, true).await.unwrap();
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_prepare_missing_root_is_noop() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        prepare_output_root(&root, false).await.unwrap();
        assert!(!root.exists());
    }
}
