use crate::error::{AppError, FileError};
use crate::models::batch::BatchItem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 支持的图片扩展名
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 判断路径是否是支持的图片文件
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 从单个文件加载图片并转换为 BatchItem
pub async fn load_image_from_file(image_path: &Path) -> Result<BatchItem> {
    let image = fs::read(image_path)
        .await
        .with_context(|| format!("无法读取图片文件: {}", image_path.display()))?;

    let file_name = image_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .with_context(|| format!("无法获取文件名: {}", image_path.display()))?;

    Ok(BatchItem::new(file_name, image))
}

/// 从文件夹中加载所有图片并转换为 BatchItem 列表
///
/// 只收集 .jpg / .jpeg / .png 文件（大小写不敏感），
/// 按文件名排序以保证批次输入顺序确定
pub async fn load_all_images(folder_path: &str) -> Result<Vec<BatchItem>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        })
        .into());
    }

    let mut image_paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            image_paths.push(path);
        }
    }

    // 目录遍历顺序与平台相关，按文件名排序保证输入顺序确定
    image_paths.sort();

    let mut items = Vec::with_capacity(image_paths.len());
    for path in &image_paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_image_from_file(path).await {
            Ok(item) => {
                tracing::info!("成功加载 {} 字节", item.image.len());
                items.push(item);
            }
            Err(e) => {
                tracing::warn!("加载图片失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("house.png")));
        assert!(is_supported_image(Path::new("tree.JPG")));
        assert!(is_supported_image(Path::new("person.Jpeg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("archive.zip")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[tokio::test]
    async fn test_load_all_images_missing_folder() {
        let result = load_all_images("/nonexistent/folder/for/tests").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_all_images_sorted() {
        let dir = std::env::temp_dir().join("htp_loader_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.png"), [2u8]).unwrap();
        std::fs::write(dir.join("a.jpg"), [1u8]).unwrap();
        std::fs::write(dir.join("c.txt"), [3u8]).unwrap();

        let items = load_all_images(dir.to_str().unwrap()).await.unwrap();

        let names: Vec<&str> = items.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
