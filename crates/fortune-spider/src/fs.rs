use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::trace;

/// Reads a `.json` file from `path`.
pub async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}

/// Writes `data` to `path` as pretty-printed JSON, replacing whatever was there.
///
/// The parent directory is created, as necessary. The write is a plain overwrite; an interrupted
/// run can leave a partial file behind.
pub async fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> anyhow::Result<()> {
    let path = path.as_ref();

    // ensure the directory exists
    if let Some(dir_path) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        trace!("checking directory path: {}", dir_path.display());
        tokio::fs::create_dir_all(dir_path).await?;
    }

    let mut bytes = serde_json::to_vec_pretty(data)?;
    bytes.push(b'\n');
    tokio::fs::write(path, bytes).await?;
    trace!("{} written", path.display());

    Ok(())
}

/// Reads a text file (e.g. a saved `.html` page) from `path`.
pub async fn read_text(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn json_files_are_overwritten_whole() {
        let dir = std::env::temp_dir().join(format!("fortune-spider-fs-{}", std::process::id()));
        let path = dir.join("nested").join("data.json");

        let first: BTreeMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
        write_json(&path, &first).await.unwrap();
        let second: BTreeMap<&str, u32> = [("c", 3)].into_iter().collect();
        write_json(&path, &second).await.unwrap();

        let read: BTreeMap<String, u32> = read_json(&path).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read["c"], 3);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
