//! Fruit Option Model

use serde::{Deserialize, Serialize};

/// A selectable smoothie ingredient (row of `fruit_options`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FruitOption {
    pub name: String,
}

impl FruitOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fruit option list as shown to the user
///
/// When the read failed, `options` is empty and `warning` carries a
/// user-facing message; the form stays usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FruitOptionList {
    pub options: Vec<FruitOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
