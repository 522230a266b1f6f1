use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::html::html_to_text;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "txt" | "md" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Ok(content)
            }
            "html" | "htm" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Ok(html_to_text(&content))
            }
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    pub async fn read_directory(dir: &Path) -> Result<Vec<(String, String)>> {
        let mut files = Vec::new();

        let mut entries = fs::read_dir(dir)
            .await
            .context(format!("Failed to read directory: {:?}", dir))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    if matches!(ext, "txt" | "md" | "html" | "htm") {
                        let content = Self::read_file(&path).await?;
                        let path_str = path.to_string_lossy().to_string();
                        files.push((path_str, content));
                    }
                }
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_text_and_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Plain policy.").unwrap();
        std::fs::write(dir.path().join("b.html"), "<p>We use <i>cookies</i>.</p>").unwrap();
        std::fs::write(dir.path().join("c.pdf"), "ignored").unwrap();

        let files = FileReader::read_directory(dir.path()).await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1, "Plain policy.");
        assert_eq!(files[1].1, "We use cookies.");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.pdf");
        std::fs::write(&path, "x").unwrap();

        assert!(FileReader::read_file(&path).await.is_err());
    }
}
