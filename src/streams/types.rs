//! Resource descriptor types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header selecting the API revision of a family
pub const API_VERSION_HEADER: &str = "X-PCO-API-Version";

/// Primary key of every Planning Center resource
pub const PRIMARY_KEY: &str = "id";

/// Planning Center product an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    /// Groups product
    Groups,
    /// People product
    People,
}

impl ApiFamily {
    /// All families, in catalog order
    pub const ALL: [ApiFamily; 2] = [ApiFamily::Groups, ApiFamily::People];

    /// Lowercase name, also the stream name prefix
    pub fn as_str(self) -> &'static str {
        match self {
            ApiFamily::Groups => "groups",
            ApiFamily::People => "people",
        }
    }

    /// Path prefix under the API host
    pub fn path_prefix(self) -> &'static str {
        match self {
            ApiFamily::Groups => "groups/v2/",
            ApiFamily::People => "people/v2/",
        }
    }

    /// Value of the `X-PCO-API-Version` header
    pub fn api_version(self) -> &'static str {
        match self {
            ApiFamily::Groups => "2018-08-01",
            ApiFamily::People => "2020-07-22",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link from a child stream to the stream whose records address it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent stream
    pub stream: &'static str,
    /// Placeholder in the child path filled with a parent id
    pub partition_field: &'static str,
}

/// Static metadata for one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Stream name, `<family>_<resource>`
    pub name: &'static str,
    /// Product family, selects path prefix and version header
    pub family: ApiFamily,
    /// Path relative to the family prefix, may contain `{field}` placeholders
    pub path: &'static str,
    /// Primary key field
    pub primary_key: &'static str,
    /// Parent stream for id-parameterized paths
    pub parent: Option<ParentLink>,
}

impl ResourceDescriptor {
    /// Whether the stream is read once per parent record
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Path relative to the API host, placeholders still unrendered
    pub fn request_path(&self) -> String {
        format!("{}{}", self.family.path_prefix(), self.path)
    }

    /// The version header this stream's requests must carry
    pub fn version_header(&self) -> (&'static str, &'static str) {
        (API_VERSION_HEADER, self.family.api_version())
    }
}
