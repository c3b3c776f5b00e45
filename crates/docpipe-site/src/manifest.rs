//! Package manifest (`package.json`) metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SiteError;

/// The parts of a `package.json` the site displays.
///
/// Unknown fields are ignored. `license` and `repository` are kept as raw
/// JSON because packages write them either as a string or as an object.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PackageManifest {
    /// Package name.
    pub name: String,
    /// Package version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// One-line description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project homepage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<Value>,
}

impl PackageManifest {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Read`] if the file cannot be read and
    /// [`SiteError::Manifest`] if it is not valid JSON.
    pub fn read(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SiteError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest JSON.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// SPDX license name, from either `"MIT"` or `{ "type": "MIT" }`.
    pub fn license(&self) -> Option<&str> {
        match self.license.as_ref()? {
            Value::String(name) => Some(name.as_str()),
            Value::Object(object) => object.get("type")?.as_str(),
            _ => None,
        }
    }

    /// Repository URL, from either a string or `{ "url": ... }`.
    pub fn repository_url(&self) -> Option<&str> {
        match self.repository.as_ref()? {
            Value::String(url) => Some(url.as_str()),
            Value::Object(object) => object.get("url")?.as_str(),
            _ => None,
        }
    }
}
