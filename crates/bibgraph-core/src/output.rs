//! Serialized graph output with atomic tmp→rename

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::graph::{Graph, OutputFormat};

/// `<file>.tmp` next to the final path.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `path` through `<file>.tmp`, renaming only once `write` succeeded.
///
/// The parent directory is created if missing; a stale tmp file is replaced
/// and a failed write leaves no tmp file behind. Returns the bytes written.
fn replace_atomic<F>(path: &Path, write: F) -> io::Result<u64>
where
    F: FnOnce(BufWriter<File>) -> io::Result<BufWriter<File>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    if tmp.exists() {
        fs::remove_file(&tmp)?;
    }

    let result = (|| {
        let writer = write(BufWriter::new(File::create(&tmp)?))?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        Ok::<_, io::Error>(file.metadata()?.len())
    })();

    match result {
        Ok(bytes) => {
            fs::rename(&tmp, path)?;
            log::debug!("Wrote {bytes} bytes to {}", path.display());
            Ok(bytes)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Write the graph to `path`, replacing it only once the write succeeded.
///
/// Returns the number of bytes written.
pub fn write_graph(graph: &Graph, format: OutputFormat, path: &Path) -> io::Result<u64> {
    replace_atomic(path, |writer| graph.write(format, writer))
}

/// Write arbitrary bytes (e.g. a JSON report) the same way.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    replace_atomic(path, |mut writer| {
        writer.write_all(contents)?;
        Ok(writer)
    })
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode, Triple};
    use tempfile::TempDir;

    fn graph() -> Graph {
        let mut g = Graph::new();
        g.insert(&Triple::new(
            NamedNode::new_unchecked("http://universidades.ec/resource/publication/x"),
            NamedNode::new_unchecked("http://purl.org/dc/terms/title"),
            Literal::new_simple_literal("X"),
        ));
        g
    }

    #[test]
    fn writes_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("graph.ttl");
        let bytes = write_graph(&graph(), OutputFormat::Turtle, &path).unwrap();
        assert!(bytes > 0);
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"X\""));
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.nt");
        fs::write(&path, "stale").unwrap();
        fs::write(tmp_path(&path), "stale tmp").unwrap();
        write_graph(&graph(), OutputFormat::NTriples, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/a/b.ttl")),
            PathBuf::from("/a/b.ttl.tmp")
        );
    }

    #[test]
    fn write_atomic_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn write_atomic_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("nested").join("run.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_write_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.ttl");
        let err = replace_atomic(&path, |_| Err(io::Error::other("boom"))).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!path.exists());
        assert!(!tmp_path(&path).exists());
    }
}
