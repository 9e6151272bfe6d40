use serde::{Deserialize, Serialize};
use url::Url;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(RecordId);

/// Fallback a detail view shows for a record without a type.
pub const NOT_AVAILABLE: &str = "N/A";
/// Fallback a list view shows for a record without a type.
pub const NO_TYPE: &str = "No type";

/// One display-ready collection item.
///
/// Fields are private so a record cannot change after the mapper produced it.
/// Absent optional values stay absent; consumers choose their own fallback
/// text at render time through [`Record::type_or`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    id: RecordId,
    name: String,
    status: String,
    species: String,
    kind: Option<String>,
    gender: String,
    image: Option<Url>,
}

impl Record {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        status: impl Into<String>,
        species: impl Into<String>,
        kind: Option<String>,
        gender: impl Into<String>,
        image: Option<Url>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            status: status.into(),
            species: species.into(),
            kind,
            gender: gender.into(),
            image,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn record_type(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn type_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.kind.as_deref().unwrap_or(fallback)
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image.as_ref()
    }
}

/// Navigation links of one page. The client only echoes these back to the
/// gateway and never builds them itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<Url>,
    pub previous: Option<Url>,
}

impl PageLinks {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageEnvelope {
    pub links: PageLinks,
    pub records: Vec<Record>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u64>,
}
