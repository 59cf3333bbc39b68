use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

pub type StoreHandle = Arc<Mutex<SourceStore>>;

/// Revoking a locator that is not (or no longer) registered.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownUrl(pub String);

impl fmt::Display for UnknownUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown source url: {}", self.0)
    }
}

impl std::error::Error for UnknownUrl {}

/// Process-local registry of in-memory audio sources.
///
/// `create` takes ownership of raw bytes and hands back a `mem://track/<n>`
/// locator; the media thread resolves locators back to bytes. Locators must
/// be revoked when their track is removed, or the bytes live for the rest
/// of the session.
#[derive(Debug, Default)]
pub struct SourceStore {
    next_id: u64,
    entries: HashMap<String, Arc<[u8]>>,
}

impl SourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> StoreHandle {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Register `bytes` and mint a fresh locator for them.
    pub fn create(&mut self, bytes: Vec<u8>) -> String {
        let url = format!("mem://track/{}", self.next_id);
        self.next_id += 1;
        self.entries.insert(url.clone(), Arc::from(bytes));
        url
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.entries.get(url).cloned()
    }

    /// Drop the bytes behind `url`. Revoking twice (or revoking a locator
    /// this store never minted) is an error the caller may discard.
    pub fn revoke(&mut self, url: &str) -> Result<(), UnknownUrl> {
        match self.entries.remove(url) {
            Some(_) => Ok(()),
            None => Err(UnknownUrl(url.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
