//! KGML (pathway XML) scanning.

use quick_xml::{events::Event, Reader};
use tracing::warn;

use super::ids::EntityKind;

/// Drug codes named by `<entry type="drug">` elements of a KGML document.
///
/// An entry's `name` attribute holds whitespace-separated `dr:` identifiers.
/// Malformed XML yields an empty list.
pub fn drug_entries(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut drugs = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"entry" => {
                let attr = |key: &str| {
                    e.try_get_attribute(key)
                        .ok()
                        .flatten()
                        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
                };
                if attr("type").as_deref() != Some("drug") {
                    continue;
                }
                if let Some(names) = attr("name") {
                    drugs.extend(
                        names
                            .split_whitespace()
                            .filter_map(|name| EntityKind::Drug.normalise(name)),
                    );
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, position = reader.buffer_position(), "malformed kgml");
                return Vec::new();
            }
        }
    }
    drugs.sort();
    drugs.dedup();
    drugs
}
