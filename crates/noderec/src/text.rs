//! The "enr:" text form: a prefix and unpadded URL-safe base64 of the
//! encoded record.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use noderec_core::{Record, SchemeRegistry};

use crate::error::{NodeError, Result};

/// Prefix of the text form.
pub const TEXT_PREFIX: &str = "enr:";

/// Encode a signed record as text.
pub fn to_text(record: &Record) -> Result<String> {
    let encoded = record.encode()?;
    Ok(format!("{}{}", TEXT_PREFIX, URL_SAFE_NO_PAD.encode(encoded)))
}

/// Parse and verify a record from its text form.
pub fn parse_text(s: &str, registry: &SchemeRegistry) -> Result<Record> {
    let body = s.strip_prefix(TEXT_PREFIX).ok_or(NodeError::MissingPrefix)?;
    let bytes = URL_SAFE_NO_PAD.decode(body)?;
    Ok(Record::decode(&bytes, registry)?)
}

/// Text form methods on [`Record`].
pub trait RecordText {
    fn to_text(&self) -> Result<String>;
}

impl RecordText for Record {
    fn to_text(&self) -> Result<String> {
        to_text(self)
    }
}

#[cfg(test)]
mod tests {
    use noderec_core::{Error, Udp};
    use noderec_identity::{sign_v4, standard_registry, SecretKey};

    use super::*;

    const REFERENCE_TEXT: &str = "enr:-IS4QHCYrYZbAKWCBRlAy5zzaDZXJBGkcnh4MHcBFZntXNFrdvJjX04jRzjzCBOonrkTfj499SZuOh8R33Ls8RRcy5wBgmlkgnY0gmlwhH8AAAGJc2VjcDI1NmsxoQPKY0yuDUmstAHYpMa2_oxVtw0RW_QAdpzBQA8yWM0xOIN1ZHCCdl8";

    #[test]
    fn test_reference_text_roundtrip() {
        let record = parse_text(REFERENCE_TEXT, &standard_registry()).unwrap();
        assert_eq!(record.sequence(), 1);
        assert_eq!(record.get::<Udp>().unwrap(), Udp(30303));
        assert_eq!(record.to_text().unwrap(), REFERENCE_TEXT);
    }

    #[test]
    fn test_sign_to_text() {
        let mut record = Record::new();
        record.set(&Udp(1));
        assert!(matches!(
            to_text(&record),
            Err(NodeError::Record(Error::UnsignedRecord))
        ));

        sign_v4(&mut record, &SecretKey::generate()).unwrap();
        let text = to_text(&record).unwrap();
        assert!(text.starts_with(TEXT_PREFIX));
        assert!(!text.contains('='));
        assert_eq!(parse_text(&text, &standard_registry()).unwrap(), record);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        let registry = standard_registry();
        assert!(matches!(
            parse_text(&REFERENCE_TEXT[4..], &registry),
            Err(NodeError::MissingPrefix)
        ));
        assert!(matches!(
            parse_text("enr:!!!", &registry),
            Err(NodeError::Base64(_))
        ));
        assert!(matches!(
            parse_text("enr:", &registry),
            Err(NodeError::Record(_))
        ));
    }
}
