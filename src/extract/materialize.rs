use crate::error::Result;
use std::path::Path;

/// Create a directory target, parents included. Already-exists is success,
/// so concurrent sibling tasks can race on shared ancestors.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Create only the parent directory of a file target.
pub async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c");

        ensure_dir(&target).await.unwrap();
        assert!(target.is_dir());

        // Second call on an existing tree is still success
        ensure_dir(&target).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_parent_creates_only_parent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Actor/Pack/Enemy.bgyml");

        ensure_parent(&target).await.unwrap();
        assert!(target.parent().unwrap().is_dir());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_concurrent_siblings_share_ancestors() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("shared/one/file.yml");
        let b = temp.path().join("shared/two/file.yml");
        let c = temp.path().join("shared/one/other.yml");

        let (ra, rb, rc) = tokio::join!(ensure_parent(&a), ensure_parent(&b), ensure_parent(&c));
        ra.unwrap();
        rb.unwrap();
        rc.unwrap();

        assert!(temp.path().join("shared/one").is_dir());
        assert!(temp.path().join("shared/two").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_parent_of_bare_name_is_noop() {
        ensure_parent(std::path::Path::new("bare_name")).await.unwrap();
    }
}
