//! In-memory zip archive of rendered files.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::export::RenderedFile;

/// Collapse entries that share a path: the last content wins, placed where the
/// path first appeared.
fn collapse_duplicates(entries: &[RenderedFile]) -> Vec<&RenderedFile> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
    let mut collapsed: Vec<&RenderedFile> = Vec::with_capacity(entries.len());

    for entry in entries {
        match slots.get(entry.filename.as_str()) {
            Some(&slot) => {
                tracing::warn!(
                    path = %entry.filename,
                    "duplicate archive path, keeping the later file"
                );
                collapsed[slot] = entry;
            }
            None => {
                slots.insert(entry.filename.as_str(), collapsed.len());
                collapsed.push(entry);
            }
        }
    }
    collapsed
}

/// Every folder prefix of a `/`-separated path, outermost first, each ending in `/`.
fn parent_dirs(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .filter(|(idx, _)| *idx > 0)
        .map(move |(idx, _)| &path[..=idx])
}

/// Package rendered files into a zip archive held in memory.
///
/// Entry paths are the filenames verbatim, so `src/index.ts` lands in an `src/`
/// folder entry. A folder entry is never added for a path that is itself a file
/// (`notes/`). Errors from the zip library are returned unchanged.
pub fn build_archive(entries: &[RenderedFile]) -> Result<Vec<u8>> {
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

    let files = collapse_duplicates(entries);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let file_paths: HashSet<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    let mut dirs: HashSet<&str> = HashSet::new();

    for file in &files {
        for dir in parent_dirs(&file.filename) {
            if !file_paths.contains(dir) && dirs.insert(dir) {
                writer.add_directory(dir, dir_options)?;
            }
        }
    }

    for file in &files {
        writer.start_file(file.filename.as_str(), file_options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    let bytes = writer.finish()?.into_inner();
    tracing::debug!(
        files = files.len(),
        dirs = dirs.len(),
        bytes = bytes.len(),
        "built archive"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn nested_path_round_trips() {
        let bytes = build_archive(&[RenderedFile::new("dir/a.txt", "hello")]).unwrap();
        assert_eq!(read_entry(&bytes, "dir/a.txt"), "hello");

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(archive.by_name("dir/").unwrap().is_dir());
    }

    #[test]
    fn every_folder_level_gets_one_directory_entry() {
        let bytes = build_archive(&[
            RenderedFile::new("src/lib/a.ts", "a"),
            RenderedFile::new("src/lib/b.ts", "b"),
            RenderedFile::new("src/index.ts", "i"),
        ])
        .unwrap();

        let names = entry_names(&bytes);
        assert_eq!(names.iter().filter(|n| *n == "src/").count(), 1);
        assert_eq!(names.iter().filter(|n| *n == "src/lib/").count(), 1);
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn duplicate_paths_are_last_write_wins() {
        let bytes = build_archive(&[
            RenderedFile::new("a.txt", "first"),
            RenderedFile::new("b.txt", "b"),
            RenderedFile::new("a.txt", "second"),
        ])
        .unwrap();

        assert_eq!(read_entry(&bytes, "a.txt"), "second");
        assert_eq!(entry_names(&bytes).len(), 2);
    }

    #[test]
    fn empty_input_is_a_valid_empty_archive() {
        let bytes = build_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn output_is_deterministic_in_content() {
        let entries = [RenderedFile::new("x/y.md", "# y")];
        let a = build_archive(&entries).unwrap();
        let b = build_archive(&entries).unwrap();
        assert_eq!(entry_names(&a), entry_names(&b));
        assert_eq!(read_entry(&a, "x/y.md"), read_entry(&b, "x/y.md"));
    }

    #[test]
    fn trailing_slash_filename_does_not_clash_with_folder_entry() {
        let bytes = build_archive(&[RenderedFile::new("notes/", "x")]).unwrap();
        assert_eq!(entry_names(&bytes), ["notes/"]);

        let bytes = build_archive(&[
            RenderedFile::new("a/b", "file"),
            RenderedFile::new("a/b/", "slash"),
        ])
        .unwrap();
        let names = entry_names(&bytes);
        assert_eq!(names.iter().filter(|n| *n == "a/b/").count(), 1);
        assert_eq!(read_entry(&bytes, "a/b"), "file");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn parent_dirs_skips_leading_slash() {
        let dirs: Vec<_> = parent_dirs("/a/b/c.txt").collect();
        assert_eq!(dirs, ["/a/", "/a/b/"]);
        assert_eq!(parent_dirs("plain.txt").count(), 0);
    }
}
