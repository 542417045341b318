//! Model serialization and deserialization using `MessagePack`.
//!
//! A model is saved as one blob per entity kind. Each blob is the kind's
//! list of stored records, encoded with field names.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use trattoria_foundation::{Error, ErrorContext, ErrorKind, Result};
use trattoria_model::{Extents, HasExtent, KindVisitor, Model, Persisted, Rebuild, StoredRecord};

/// Serializes a value to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(value)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a value from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Encoded extents, keyed by kind name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Archive {
    blobs: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes every extent of a model, including empty ones.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn save(model: &Model) -> Result<Self> {
        let mut encoder = Encoder {
            model,
            only: None,
            archive: Self::new(),
        };
        Extents::visit(&mut encoder)?;
        Ok(encoder.archive)
    }

    /// Encodes a single extent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown kind, or an error if serialization
    /// fails.
    pub fn save_extent(model: &Model, kind: &str) -> Result<Vec<u8>> {
        let mut encoder = Encoder {
            model,
            only: Some(kind),
            archive: Self::new(),
        };
        Extents::visit(&mut encoder)?;
        encoder
            .archive
            .blobs
            .remove(kind)
            .ok_or_else(|| Error::not_found(format!("no extent named {kind}")))
    }

    /// Rebuilds a model from the archive.
    ///
    /// A kind without a blob loads as an empty extent.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` for a blob of an unknown kind or a broken
    /// graph, a serialization error for an undecodable blob, or any error
    /// from restoring the records.
    pub fn load(&self) -> Result<Model> {
        if let Some(kind) = self.kinds().find(|kind| !Extents::KINDS.contains(kind)) {
            return Err(Error::corrupt(format!("unknown extent {kind}")));
        }

        let mut decoder = Decoder {
            archive: self,
            rebuild: Rebuild::new(),
        };
        Extents::visit(&mut decoder)?;
        decoder.rebuild.finish()
    }

    /// Stores a blob, replacing any previous one for the kind.
    pub fn insert(&mut self, kind: impl Into<String>, blob: Vec<u8>) {
        self.blobs.insert(kind.into(), blob);
    }

    /// Returns the blob for a kind.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&[u8]> {
        self.blobs.get(kind).map(Vec::as_slice)
    }

    /// Iterates kind names in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.blobs.keys().map(String::as_str)
    }

    /// Iterates `(kind, blob)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.blobs.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the number of blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns true if the archive holds no blobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

struct Encoder<'a> {
    model: &'a Model,
    only: Option<&'a str>,
    archive: Archive,
}

impl KindVisitor for Encoder<'_> {
    fn visit<T>(&mut self) -> Result<()>
    where
        T: Persisted,
        Extents: HasExtent<T>,
    {
        if self.only.is_some_and(|kind| kind != T::KIND) {
            return Ok(());
        }
        let records = self.model.export::<T>();
        let blob = to_bytes(&records)?;
        tracing::debug!(kind = T::KIND, records = records.len(), bytes = blob.len(), "saved extent");
        self.archive.insert(T::KIND, blob);
        Ok(())
    }
}

struct Decoder<'a> {
    archive: &'a Archive,
    rebuild: Rebuild,
}

impl KindVisitor for Decoder<'_> {
    fn visit<T>(&mut self) -> Result<()>
    where
        T: Persisted,
        Extents: HasExtent<T>,
    {
        let records: Vec<StoredRecord<T::Stored>> = match self.archive.get(T::KIND) {
            Some(blob) => from_bytes(blob).map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .with_operation("load")
                        .with_frame(format!("extent {}", T::KIND)),
                )
            })?,
            None => Vec::new(),
        };
        tracing::debug!(kind = T::KIND, records = records.len(), "loaded extent");
        self.rebuild.restore::<T>(records)
    }
}
