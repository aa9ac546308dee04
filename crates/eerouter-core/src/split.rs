// ── Multi-MAC splitting (Smart Hub) ──
//
// The Smart Hub groups a device that rotates private MAC addresses into one
// entry with comma-joined values: `mac:'A,B'`, `ip:'1.1.1.1,2.2.2.2'`. Each
// MAC becomes its own record.

use eerouter_api::RawRecord;

/// Fields whose comma-joined values are distributed across the split copies.
pub const SPLIT_FIELDS: [&str; 6] = [
    "mac",
    "activity_ip",
    "activity_ipv6",
    "activity_ipv6_ll",
    "ip",
    "port",
];

/// Expand every record whose `mac` holds several addresses.
///
/// Copy `i` receives the `i`-th slice of each comma-joined split field; other
/// fields are shared. Slices beyond the MAC count are ignored, and copies
/// beyond a field's slice count keep its original value. Each split copy's
/// `activity` is set to its own `activity_ip`. Records with a single MAC, or
/// none, pass through unchanged.
pub fn split_multimac(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records.into_iter().flat_map(split_record).collect()
}

fn split_record(record: RawRecord) -> Vec<RawRecord> {
    let count = match record.get("mac") {
        Some(mac) if mac.contains(',') => mac.split(',').count(),
        _ => return vec![record],
    };

    let mut copies = vec![record.clone(); count];
    for (key, value) in &record {
        if !value.contains(',') || !SPLIT_FIELDS.contains(&key.as_str()) {
            continue;
        }
        for (copy, slice) in copies.iter_mut().zip(value.split(',')) {
            copy.insert(key.clone(), slice.to_owned());
        }
    }

    for copy in &mut copies {
        if let Some(activity_ip) = copy.get("activity_ip").cloned() {
            copy.insert("activity".to_owned(), activity_ip);
        }
    }
    copies
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn splits_aligned_slices() {
        let out = split_multimac(vec![raw(&[
            ("mac", "A,B"),
            ("ip", "1.1.1.1,2.2.2.2"),
            ("activity_ip", "yes,no"),
            ("hostname", "shared"),
        ])]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["mac"], "A");
        assert_eq!(out[0]["ip"], "1.1.1.1");
        assert_eq!(out[0]["activity"], "yes");
        assert_eq!(out[1]["mac"], "B");
        assert_eq!(out[1]["ip"], "2.2.2.2");
        assert_eq!(out[1]["activity"], "no");
        assert_eq!(out[1]["hostname"], "shared");
    }

    #[test]
    fn single_mac_passes_through_untouched() {
        let record = raw(&[("mac", "A"), ("activity_ip", "1"), ("activity", "0")]);
        let out = split_multimac(vec![record.clone()]);
        assert_eq!(out, vec![record]);
    }

    #[test]
    fn record_without_mac_passes_through() {
        let record = raw(&[("hostname", "ghost")]);
        assert_eq!(split_multimac(vec![record.clone()]), vec![record]);
    }

    #[test]
    fn non_split_fields_keep_commas() {
        let out = split_multimac(vec![raw(&[("mac", "A,B"), ("hostname", "a,b")])]);
        assert_eq!(out[0]["hostname"], "a,b");
        assert_eq!(out[1]["hostname"], "a,b");
    }

    #[test]
    fn extra_slices_ignored_and_short_lists_keep_original() {
        let out = split_multimac(vec![raw(&[
            ("mac", "A,B,C"),
            ("ip", "1,2,3,4"),
            ("port", "eth0,ath0"),
            ("activity_ip", "1"),
        ])]);
        assert_eq!(out.len(), 3);
        let ips: Vec<&str> = out.iter().map(|r| r["ip"].as_str()).collect();
        assert_eq!(ips, ["1", "2", "3"]);
        assert_eq!(out[1]["port"], "ath0");
        assert_eq!(out[2]["port"], "eth0,ath0");
        assert!(out.iter().all(|r| r["activity"] == "1"));
    }

    #[test]
    fn split_copies_gain_activity_key() {
        let out = split_multimac(vec![raw(&[("mac", "A,B"), ("activity_ip", "1,0")])]);
        assert_eq!(
            out[0].keys().collect::<Vec<_>>(),
            ["mac", "activity_ip", "activity"]
        );
    }

    #[test]
    fn preserves_record_order() {
        let out = split_multimac(vec![
            raw(&[("mac", "X")]),
            raw(&[("mac", "A,B"), ("activity_ip", "1,1")]),
            raw(&[("mac", "Y")]),
        ]);
        let macs: Vec<&str> = out.iter().map(|r| r["mac"].as_str()).collect();
        assert_eq!(macs, ["X", "A", "B", "Y"]);
    }
}
