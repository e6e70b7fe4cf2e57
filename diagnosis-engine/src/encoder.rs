//! Categorical encoders
//!
//! An encoder maps a categorical string to the integer code it was given when
//! the encoder was fitted. The vocabulary is closed: anything outside it is an
//! [`EngineError::UnknownCategory`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// A fitted categorical encoder.
#[cfg_attr(test, mockall::automock)]
pub trait CategoryEncoder: Send + Sync {
    /// Integer code for `value`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCategory`] when `value` is outside the
    /// encoder's vocabulary.
    fn encode(&self, value: &str) -> Result<u32>;

    /// The known categories, ordered by code.
    fn vocabulary(&self) -> Vec<String>;
}

/// On-disk shape of a label encoder export
#[derive(Debug, Deserialize)]
pub struct LabelEncoderArtifact {
    pub classes: Vec<String>,
}

/// Label encoder: the code of a category is its position in `classes`.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    name: String,
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Build an encoder named `name` over `classes`.
    ///
    /// # Errors
    ///
    /// Fails when `classes` is empty, holds a duplicate, or is too large to
    /// number with `u32` codes.
    pub fn new(name: impl Into<String>, classes: Vec<String>) -> Result<Self> {
        let name = name.into();
        if classes.is_empty() {
            return Err(EngineError::artifact(&name, "encoder has no classes"));
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            let code = u32::try_from(position)
                .map_err(|_| EngineError::artifact(&name, "too many classes"))?;
            if codes.insert(class.clone(), code).is_some() {
                return Err(EngineError::artifact(
                    &name,
                    format!("duplicate class {class:?}"),
                ));
            }
        }

        Ok(Self {
            name,
            classes,
            codes,
        })
    }

    pub fn from_artifact(name: impl Into<String>, artifact: LabelEncoderArtifact) -> Result<Self> {
        Self::new(name, artifact.classes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl CategoryEncoder for LabelEncoder {
    fn encode(&self, value: &str) -> Result<u32> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| EngineError::UnknownCategory {
                encoder: self.name.clone(),
                value: value.to_string(),
            })
    }

    fn vocabulary(&self) -> Vec<String> {
        self.classes.clone()
    }
}
