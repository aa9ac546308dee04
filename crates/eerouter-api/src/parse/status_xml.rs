// BrightBox 2 `status_conn.xml`
//
// A flat document: one root element whose children each carry their data
// in a `value` attribute, e.g. `<deviceDB value="[{mac:'..'}]"/>`. Only the
// direct children of the root are indexed.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ParseError;

/// Index of the root's child elements and their `value` attributes.
#[derive(Debug, Clone, Default)]
pub struct StatusDocument {
    elements: IndexMap<String, Option<String>>,
}

impl StatusDocument {
    /// Parse the document text. The first child with a given name wins.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut elements = IndexMap::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if depth == 1 {
                        let (name, value) = read_element(&e, &reader)?;
                        elements.entry(name).or_insert(value);
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    if depth == 1 {
                        let (name, value) = read_element(&e, &reader)?;
                        elements.entry(name).or_insert(value);
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { elements })
    }

    /// The `value` attribute of the named element.
    pub fn value(&self, element: &str) -> Result<&str, ParseError> {
        match self.elements.get(element) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(ParseError::MissingAttribute {
                element: element.to_owned(),
                attribute: "value".to_owned(),
            }),
            None => Err(ParseError::MissingElement(element.to_owned())),
        }
    }

    /// The `deviceDB` blob holding the known-device list.
    pub fn device_db(&self) -> Result<&str, ParseError> {
        self.value("deviceDB")
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn read_element(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<(String, Option<String>), ParseError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut value = None;
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"value" {
            value = Some(
                attr.decode_and_unescape_value(reader.decoder())?
                    .into_owned(),
            );
            break;
        }
    }

    Ok((name, value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STATUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
  <deviceDB value="[{mac:'AA%3ABB',hostname:'pc'}]"/>
  <ssid_ssid value="'home','guest'"></ssid_ssid>
  <uptime/>
  <nested><deviceDB value="ignored"/></nested>
  <deviceDB value="second"/>
</status>"#;

    #[test]
    fn indexes_root_children() {
        let doc = StatusDocument::parse(STATUS).unwrap();
        assert_eq!(doc.device_db().unwrap(), "[{mac:'AA%3ABB',hostname:'pc'}]");
        assert_eq!(doc.value("ssid_ssid").unwrap(), "'home','guest'");
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn missing_element_and_attribute() {
        let doc = StatusDocument::parse(STATUS).unwrap();
        assert!(matches!(doc.value("ssid_security"), Err(ParseError::MissingElement(_))));
        assert!(matches!(doc.value("uptime"), Err(ParseError::MissingAttribute { .. })));
    }

    #[test]
    fn unescapes_entities() {
        let doc = StatusDocument::parse(r#"<s><deviceDB value="a &amp; b"/></s>"#).unwrap();
        assert_eq!(doc.device_db().unwrap(), "a & b");
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(StatusDocument::parse("<status><deviceDB></status>").is_err());
    }

    #[test]
    fn html_page_has_no_device_db() {
        let doc = StatusDocument::parse("<html><body>Login</body></html>").unwrap();
        assert!(matches!(doc.device_db(), Err(ParseError::MissingElement(_))));
    }
}
