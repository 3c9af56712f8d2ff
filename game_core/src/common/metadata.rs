use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_key::Key;

use crate::prelude::HashMap;

/// String-keyed map of JSON-encoded values, used as the payload of
/// successful op results. Fields are addressed through [`typed_key::Key`]
/// constants so writers and readers agree on the type behind each name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata(HashMap<String, String>);

#[derive(Clone, Debug, Error)]
pub enum MetadataErr {
    #[error("error from serde_json in metadata: {0}")]
    SerdeError(#[from] Arc<serde_json::Error>),
    #[error("required metadata key not found [{0}]")]
    RequiredKeyNotFound(String),
}

impl From<serde_json::Error> for MetadataErr {
    fn from(value: serde_json::Error) -> Self {
        Self::SerdeError(Arc::new(value))
    }
}

type Result<T> = std::result::Result<T, MetadataErr>;

impl Metadata {
    pub fn new() -> Self {
        Metadata::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_optional<'a, T: Deserialize<'a>>(&'a self, key: Key<T>) -> Result<Option<T>> {
        if let Some(value_str) = self.0.get(key.name()) {
            Ok(Some(serde_json::from_str(value_str)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_or_default<'a, T: Deserialize<'a> + Default>(&'a self, key: Key<T>) -> Result<T> {
        self.get_optional(key).map(|opt| opt.unwrap_or_default())
    }

    pub fn get_required<'a, T: Deserialize<'a>>(&'a self, key: Key<T>) -> Result<T> {
        if let Some(value_str) = self.0.get(key.name()) {
            Ok(serde_json::from_str(value_str)?)
        } else {
            Err(MetadataErr::RequiredKeyNotFound(key.name().to_owned()))
        }
    }

    pub fn put<T: Serialize, B: Borrow<T>>(&mut self, key: Key<T>, data: B) -> Result<()> {
        let data_str = serde_json::to_string(data.borrow())?;
        self.0.insert(key.name().to_string(), data_str);
        Ok(())
    }

    /// Puts the data if the option is [`Some`], else does nothing.
    pub fn put_optional<T: Serialize, O: Borrow<Option<T>>>(
        &mut self,
        key: Key<T>,
        data: O,
    ) -> Result<()> {
        if let Some(data_unwrapped) = data.borrow().as_ref() {
            self.put(key, data_unwrapped)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use typed_key::{typed_key, Key};

    use super::*;

    const COUNT: Key<usize> = typed_key!("count");
    const POINTS: Key<Vec<[i32; 2]>> = typed_key!("points");

    #[test]
    fn put_then_get_round_trips() {
        let mut metadata = Metadata::new();
        metadata.put(COUNT, 3).unwrap();
        metadata
            .put(POINTS, vec![[0, 0], [1, 2], [-1, 4]])
            .unwrap();

        assert_eq!(metadata.get_required(COUNT).unwrap(), 3);
        assert_eq!(
            metadata.get_required(POINTS).unwrap(),
            vec![[0, 0], [1, 2], [-1, 4]]
        );
    }

    #[test]
    fn missing_keys_are_optional_or_errors() {
        let metadata = Metadata::new();
        assert!(metadata.get_optional(COUNT).unwrap().is_none());
        assert_eq!(metadata.get_or_default(COUNT).unwrap(), 0);
        assert!(matches!(
            metadata.get_required(COUNT),
            Err(MetadataErr::RequiredKeyNotFound(_))
        ));
    }

    #[test]
    fn put_optional_skips_none() {
        let mut metadata = Metadata::new();
        metadata.put_optional(COUNT, None).unwrap();
        assert!(metadata.is_empty());
        metadata.put_optional(COUNT, Some(7)).unwrap();
        assert_eq!(metadata.get_required(COUNT).unwrap(), 7);
    }
}
