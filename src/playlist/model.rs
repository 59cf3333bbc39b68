//! Track and playlist types.

/// A single playlist entry.
///
/// `name` is whatever the picker reported (possibly empty); `url` is the
/// in-memory source locator minted when the file was added. The playlist is
/// the sole owner of its tracks; the locator is revoked when the track is
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub url: String,
}

impl Track {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Display name for list rows: the file name, or "Track N" when the
    /// picker gave us nothing usable. `index` is zero-based.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            format!("Track {}", index + 1)
        } else {
            self.name.clone()
        }
    }
}

/// Result of removing a track: the detached entry plus whether it was the
/// one currently selected (the caller must stop playback in that case).
#[derive(Debug)]
pub struct Removed {
    pub track: Track,
    pub was_current: bool,
}

/// Ordered track collection with a current-selection pointer.
///
/// Indices are dense `0..len`; `current` is either `None` or a valid index,
/// and every mutation below keeps it that way.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Append a track, preserving insertion order.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Point the selection at `index`. Returns false (and changes nothing)
    /// when the index is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Index of the track after the current one, wrapping to the front.
    /// `None` on an empty playlist.
    pub fn next_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = self.current.map_or(0, |c| c + 1);
        Some(if next >= self.tracks.len() { 0 } else { next })
    }

    /// Index of the track before the current one, wrapping to the back.
    /// `None` on an empty playlist.
    pub fn prev_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(match self.current {
            Some(c) if c > 0 => c - 1,
            _ => self.tracks.len() - 1,
        })
    }

    /// Remove the track at `index`; out-of-range is a silent no-op.
    ///
    /// Removing the current track clears the selection first; the selection
    /// is then re-derived by `reindex_after_removal` so it stays valid.
    pub fn remove(&mut self, index: usize) -> Option<Removed> {
        if index >= self.tracks.len() {
            return None;
        }

        let was_current = self.current == Some(index);
        if was_current {
            self.current = None;
        }

        let track = self.tracks.remove(index);
        self.current =
            reindex_after_removal(self.current, index, was_current, self.tracks.len());

        Some(Removed { track, was_current })
    }
}

/// Selection bookkeeping after a removal.
///
/// `current` is the selection after the delete-current reset (`None` when
/// the removed track was selected), `removed` the deleted index and `len`
/// the length of the shrunk list. The arms are order-sensitive:
/// earlier tracks shift the selection down; a just-cleared selection lands
/// on the new front of a non-empty list; anything past the end clamps.
pub(crate) fn reindex_after_removal(
    current: Option<usize>,
    removed: usize,
    was_current: bool,
    len: usize,
) -> Option<usize> {
    match current {
        Some(cur) if removed < cur => Some(cur - 1),
        None if was_current && len > 0 => Some(0),
        Some(cur) if cur >= len && len > 0 => Some(len - 1),
        _ if len == 0 => None,
        other => other,
    }
}
