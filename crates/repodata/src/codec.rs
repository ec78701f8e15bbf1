//! Record codec.
//!
//! Every archive entry holds a single property list. Decoding always
//! replaces the target value wholesale.

use serde::{de::DeserializeOwned, Serialize};

pub fn decode_record<V: DeserializeOwned>(payload: &[u8]) -> Result<V, plist::Error> {
    plist::from_bytes(payload)
}

pub fn encode_record<V: Serialize>(value: &V) -> Result<Vec<u8>, plist::Error> {
    let mut buf = Vec::new();
    plist::to_writer_xml(&mut buf, value)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_decode_xml_dictionary() {
        let payload = br#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>foo</key>
	<string>bar</string>
</dict>
</plist>"#;
        let map: BTreeMap<String, String> = decode_record(payload).unwrap();
        assert_eq!(map.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_record::<BTreeMap<String, String>>(b"not a plist").is_err());
    }
}
