use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lexi_core::{CardStore, StoreError};
use lexi_types::{Card, CardId};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::record;

const YAML_EXTENSION: &str = "yaml";
const NO_TITLE: &str = "no_title";

/// Card store keeping one YAML file per card in a flat directory.
///
/// Files are named after the card title. Cards are looked up by identity
/// through an index built from the directory on first use.
pub struct FsCardStore {
    root: PathBuf,
    index: Mutex<Option<HashMap<CardId, String>>>,
}

impl FsCardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn filename(&self, id: &CardId) -> Result<Option<String>, StoreError> {
        let mut index = self.index.lock().await;
        let index = self.ensure_index(&mut index).await?;
        Ok(index.get(id).cloned())
    }

    async fn ensure_index<'a>(
        &self,
        slot: &'a mut Option<HashMap<CardId, String>>,
    ) -> Result<&'a mut HashMap<CardId, String>, StoreError> {
        let index = match slot.take() {
            Some(index) => index,
            None => self.build_index().await?,
        };

        Ok(slot.insert(index))
    }

    async fn build_index(&self) -> Result<HashMap<CardId, String>, StoreError> {
        let filenames = self.card_filenames().await?;
        let mut index = HashMap::with_capacity(filenames.len());

        for filename in filenames {
            let data = match tokio::fs::read_to_string(self.root.join(&filename)).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(file = %filename, "Failed to read card file: {e}");
                    continue;
                }
            };

            match record::decode(&data) {
                Ok(card) => {
                    index.insert(card.id().clone(), filename);
                }
                Err(e) => tracing::warn!(file = %filename, "Skipping card file: {e}"),
            }
        }

        tracing::debug!("Indexed {} cards in {}", index.len(), self.root.display());
        Ok(index)
    }

    async fn card_filenames(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(StoreError::internal)?;
        let mut ret = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(StoreError::internal)? {
            let file_type = entry.file_type().await.map_err(StoreError::internal)?;
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(YAML_EXTENSION) {
                continue;
            }

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                ret.push(name.to_string());
            }
        }

        ret.sort();
        Ok(ret)
    }

    /// Creates a new file for `stem`, adding a `(n)` suffix until the name is free.
    async fn create_file(&self, stem: &str) -> Result<(tokio::fs::File, String), StoreError> {
        let mut counter = 0u32;

        loop {
            let filename = if counter == 0 {
                format!("{stem}.{YAML_EXTENSION}")
            } else {
                format!("{stem}({counter}).{YAML_EXTENSION}")
            };

            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&filename))
                .await;

            match opened {
                Ok(file) => return Ok((file, filename)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(StoreError::internal(e)),
            }
        }
    }
}

/// File stem for a card title: lower-cased, whitespace runs joined by `_`.
fn file_stem(title: &str) -> String {
    let stem = title
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.replace(['/', '\\'], "-"))
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        NO_TITLE.to_string()
    } else {
        stem
    }
}

/// Writes a freshly created record file, removing it when the write fails so
/// that no truncated record is left behind.
async fn write_record<W>(path: &Path, file: &mut W, data: &str) -> Result<(), StoreError>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(data.as_bytes()).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::error!(file = %path.display(), "Failed to remove partial card file: {remove_err}");
        }
        return Err(StoreError::internal(e));
    }

    Ok(())
}

fn read_error(err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound
    } else {
        StoreError::internal(err)
    }
}

#[async_trait]
impl CardStore for FsCardStore {
    async fn create(&self, card: &Card) -> Result<CardId, StoreError> {
        let mut index = self.index.lock().await;
        let index = self.ensure_index(&mut index).await?;

        if index.contains_key(card.id()) {
            return Err(StoreError::AlreadyExists);
        }

        let data = record::encode(card)?;
        let (mut file, filename) = self.create_file(&file_stem(&card.title)).await?;

        write_record(&self.root.join(&filename), &mut file, &data).await?;

        tracing::info!(id = %card.id(), file = %filename, "Card created");
        index.insert(card.id().clone(), filename);

        Ok(card.id().clone())
    }

    async fn update(&self, card: &Card) -> Result<(), StoreError> {
        let filename = self.filename(card.id()).await?.ok_or(StoreError::NotFound)?;
        let data = record::encode(card)?;

        tokio::fs::write(self.root.join(&filename), data)
            .await
            .map_err(StoreError::internal)?;

        tracing::info!(id = %card.id(), file = %filename, "Card updated");
        Ok(())
    }

    async fn get(&self, id: &CardId) -> Result<Card, StoreError> {
        let filename = self.filename(id).await?.ok_or(StoreError::NotFound)?;

        let data = tokio::fs::read_to_string(self.root.join(filename))
            .await
            .map_err(read_error)?;

        record::decode(&data)
    }

    async fn delete(&self, id: &CardId) -> Result<(), StoreError> {
        let mut index = self.index.lock().await;
        let index = self.ensure_index(&mut index).await?;

        let filename = index.get(id).ok_or(StoreError::NotFound)?;

        tokio::fs::remove_file(self.root.join(filename))
            .await
            .map_err(read_error)?;

        tracing::info!(id = %id, file = %filename, "Card deleted");
        index.remove(id);

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Card>, StoreError> {
        let filenames = self.card_filenames().await?;
        let mut ret = Vec::with_capacity(filenames.len());

        for filename in filenames {
            let data = tokio::fs::read_to_string(self.root.join(&filename))
                .await
                .map_err(StoreError::internal)?;
            ret.push(record::decode(&data)?);
        }

        Ok(ret)
    }
}
