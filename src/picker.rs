use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// A raw file handle as supplied by the picker: the reported name plus the
/// full byte content. Whoever adds it to the playlist owns the bytes from
/// here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Pick every audio file under `dir`, honoring the library settings.
///
/// Files come back sorted by name (case-insensitive) so adds are
/// deterministic; unreadable files are skipped with a warning.
pub fn pick_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PickedFile> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if !settings.recursive {
        walker = walker.max_depth(1);
    } else if let Some(depth) = settings.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files: Vec<PickedFile> = Vec::new();
    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, &settings.extensions) {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        match fs::read(path) {
            Ok(bytes) => files.push(PickedFile { name, bytes }),
            Err(e) => log::warn!("skipping unreadable file {}: {e}", path.display()),
        }
    }

    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    files
}
