// BrightBox 2 `deviceDB` blob
//
// The `value` attribute of `<deviceDB>` holds something that looks like a
// JSON array of objects but uses bare keys and single-quoted,
// percent-encoded values: `[{mac:'AA%3ABB..',hostname:'pc'},{...}]`.

use std::sync::LazyLock;

use regex::Regex;

use super::{RawRecord, percent_decode};

/// One `{...}` block. Blocks do not nest.
#[allow(clippy::unwrap_used)]
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]*)\}").unwrap());

/// One `key:'value'` pair. A quote inside the value ends it early.
#[allow(clippy::unwrap_used)]
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+):'([^']*)'").unwrap());

/// Parse the `deviceDB` blob into one record per block, in document order.
///
/// Text that does not match the `key:'value'` shape is skipped. A repeated
/// key keeps its first position and its last value.
pub fn parse_device_db(device_db: &str) -> Vec<RawRecord> {
    BLOCK_RE
        .captures_iter(device_db)
        .filter_map(|block| block.get(1))
        .map(|body| {
            PAIR_RE
                .captures_iter(body.as_str())
                .filter_map(|pair| Some((pair.get(1)?.as_str(), pair.get(2)?.as_str())))
                .map(|(key, value)| (key.to_owned(), percent_decode(value).into_owned()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_block_is_decoded() {
        let devices = parse_device_db("{mac:'AA:BB:CC:DD:EE:FF',hostname:'host%201'}");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0]["mac"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(devices[0]["hostname"], "host 1");
        assert_eq!(devices[0].len(), 2);
    }

    #[test]
    fn blocks_keep_document_order() {
        let devices = parse_device_db(
            "[{mac:'00:11:22:33:44:55',port:'eth0_1'},{mac:'66:77:88:99:AA:BB',port:'ath0'}]",
        );
        let macs: Vec<&str> = devices.iter().map(|d| d["mac"].as_str()).collect();
        assert_eq!(macs, ["00:11:22:33:44:55", "66:77:88:99:AA:BB"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(parse_device_db("").is_empty());
        assert!(parse_device_db("[]").is_empty());
        let devices = parse_device_db("{}");
        assert_eq!(devices.len(), 1);
        assert!(devices[0].is_empty());
    }

    #[test]
    fn non_matching_pairs_are_dropped() {
        let devices = parse_device_db("{mac:'AA',broken:value,other:\"x\",ip:''}");
        assert_eq!(devices[0].len(), 2);
        assert_eq!(devices[0]["ip"], "");
    }

    #[test]
    fn unescaped_quote_truncates_value() {
        let devices = parse_device_db("{hostname:'bob's-pc',mac:'AA'}");
        assert_eq!(devices[0]["hostname"], "bob");
        assert_eq!(devices[0]["mac"], "AA");
    }

    #[test]
    fn nested_braces_end_block_early() {
        let devices = parse_device_db("{a:'1',inner:{b:'2'},c:'3'}");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].get("a").map(String::as_str), Some("1"));
        assert!(devices[0].get("c").is_none());
    }

    #[test]
    fn decodes_utf8_sequences() {
        let devices = parse_device_db("{hostname:'caf%C3%A9'}");
        assert_eq!(devices[0]["hostname"], "café");
    }
}
