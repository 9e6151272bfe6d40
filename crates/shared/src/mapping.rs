//! Pure conversions from the wire envelope into display-ready domain values.

use url::Url;

use crate::{
    domain::{PageEnvelope, PageLinks, Record, RecordId},
    protocol::{RawEnvelope, RawPageInfo, RawRecord},
};

/// Missing, empty or unparsable strings all read as "no link".
fn parse_link(raw: Option<&str>) -> Option<Url> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Url::parse(raw).ok()
}

/// The provider sends `""` for records without a type; treat it like `null`.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

pub fn map_record(raw: RawRecord) -> Record {
    let image = parse_link(raw.image.as_deref());
    Record::new(
        RecordId(raw.id),
        raw.name,
        raw.status,
        raw.species,
        non_blank(raw.kind),
        raw.gender,
        image,
    )
}

pub fn map_links(info: &RawPageInfo) -> PageLinks {
    PageLinks {
        next: parse_link(info.next.as_deref()),
        previous: parse_link(info.prev.as_deref()),
    }
}

pub fn map_envelope(raw: RawEnvelope) -> PageEnvelope {
    let links = map_links(&raw.info);
    PageEnvelope {
        links,
        records: raw.results.into_iter().map(map_record).collect(),
        total_count: raw.info.count,
        total_pages: raw.info.pages,
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
