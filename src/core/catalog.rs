//! Catalog loading and validation.
//!
//! The catalog is parsed from RON once at startup, validated, and then
//! treated as immutable — every engine component borrows it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::background::Background;
use crate::schema::pose::CharacterPose;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("catalog has no poses")]
    NoPoses,
    #[error("catalog has no backgrounds")]
    NoBackgrounds,
    #[error("pose '{0}' has no variations")]
    NoVariations(String),
    #[error("duplicate pose id '{0}'")]
    DuplicatePoseId(String),
    #[error("background '{0}' has no subtypes")]
    NoSubtypes(String),
    #[error("subtype '{subtype}' of background '{background}' has no variations")]
    EmptySubtype { background: String, subtype: String },
}

/// The full asset library: every pose and background the engine can choose
/// from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub poses: Vec<CharacterPose>,
    pub backgrounds: Vec<Background>,
}

impl Catalog {
    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<Catalog, CatalogError> {
        Ok(ron::from_str(input)?)
    }

    /// Check the catalog invariants: non-empty on both sides, at least one
    /// variation per pose and per subtype, and globally unique pose ids.
    /// A violation is a fatal configuration error; there is no safe
    /// placeholder asset to fall back to.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.poses.is_empty() {
            return Err(CatalogError::NoPoses);
        }
        if self.backgrounds.is_empty() {
            return Err(CatalogError::NoBackgrounds);
        }

        let mut seen_ids = std::collections::HashSet::new();
        for pose in &self.poses {
            if !seen_ids.insert(pose.id.as_str()) {
                return Err(CatalogError::DuplicatePoseId(pose.id.clone()));
            }
            if pose.variations.is_empty() {
                return Err(CatalogError::NoVariations(pose.id.clone()));
            }
        }

        for background in &self.backgrounds {
            if background.subtypes.is_empty() {
                return Err(CatalogError::NoSubtypes(background.id.clone()));
            }
            for subtype in &background.subtypes {
                if subtype.variations.is_empty() {
                    return Err(CatalogError::EmptySubtype {
                        background: background.id.clone(),
                        subtype: subtype.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Poses owned by the given character, in catalog order.
    pub fn poses_for<'a, 'b>(
        &'a self,
        character: &'b str,
    ) -> impl Iterator<Item = &'a CharacterPose> + use<'a, 'b> {
        self.poses
            .iter()
            .filter(move |pose| pose.character == character)
    }

    /// Distinct character ids, in first-appearance order.
    pub fn characters(&self) -> Vec<&str> {
        let mut characters = Vec::new();
        for pose in &self.poses {
            if !characters.contains(&pose.character.as_str()) {
                characters.push(pose.character.as_str());
            }
        }
        characters
    }
}
