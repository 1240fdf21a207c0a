use std::{
    collections::BTreeMap,
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::Mutex,
};
use tracing::{debug, trace};

/// Name of the file [FileKeyValueStore] keeps inside the application directory.
pub const STORE_FILE_NAME: &str = "store.json";

type Entries = BTreeMap<String, String>;

/// Interface for abstracting the device key-value storage. Values are opaque strings; callers
/// decide how to encode them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>>;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>>;

    /// Returns every key in ascending order.
    fn all_keys(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Fetches several keys at once. The output keeps the order of `keys`.
    fn multi_get(&self, keys: &[String]) -> impl Future<Output = Result<Vec<(String, Option<String>)>>>;
}

impl<T: Deref> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> {
        self.deref().set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> {
        self.deref().remove(key)
    }

    fn all_keys(&self) -> impl Future<Output = Result<Vec<String>>> {
        self.deref().all_keys()
    }

    fn multi_get(&self, keys: &[String]) -> impl Future<Output = Result<Vec<(String, Option<String>)>>> {
        self.deref().multi_get(keys)
    }
}

fn pick(entries: &Entries, keys: &[String]) -> Vec<(String, Option<String>)> {
    keys.iter()
        .map(|key| (key.clone(), entries.get(key).cloned()))
        .collect()
}

/// The main realization of [KeyValueStore]. All entries are kept in a single JSON object file,
/// which is locked for the duration of every read or write.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    pub fn in_dir(dir: &Path) -> Result<Self, std::io::Error> {
        Self::new(dir.join(STORE_FILE_NAME))
    }

    async fn read_entries(&self) -> Result<Entries> {
        async fn extract(path: &Path) -> std::result::Result<String, std::io::Error> {
            trace!("Reading store {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut content = String::new();
            let read = file.read_to_string(&mut content).await;
            file.unlock_async().await?;
            read?;
            Ok(content)
        }

        match extract(&self.path).await {
            Ok(content) => parse_entries(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update<T>(&self, change: impl FnOnce(&mut Entries) -> T) -> Result<T> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::update_with_file(&mut file, change).await;
        file.unlock_async().await?;
        result
    }

    async fn update_with_file<T>(
        file: &mut File,
        change: impl FnOnce(&mut Entries) -> T,
    ) -> Result<T> {
        let mut content = String::new();
        file.read_to_string(&mut content).await?;
        let mut entries = parse_entries(&content)?;

        let result = change(&mut entries);

        let payload = serde_json::to_vec_pretty(&entries)?;
        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(&payload).await?;
        file.flush().await?;
        Ok(result)
    }
}

fn parse_entries(content: &str) -> Result<Entries> {
    if content.trim().is_empty() {
        return Ok(Entries::new());
    }
    Ok(serde_json::from_str(content)?)
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        debug!("Writing key {key}");
        self.update(|entries| {
            entries.insert(key.to_owned(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        debug!("Removing key {key}");
        self.update(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.read_entries().await?.into_keys().collect())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        let entries = self.read_entries().await?;
        Ok(pick(&entries, keys))
    }
}

/// Keeps everything in memory. Useful for tests and for embedding without a device store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<Entries>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K: Into<String>, V: Into<String>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        Ok(pick(&*self.entries.lock().await, keys))
    }
}
