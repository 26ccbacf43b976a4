//! Shared test infrastructure for zone check integration tests.

#![allow(dead_code)]

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use trust_dns_proto::rr::rdata::{MX, TXT};
use trust_dns_proto::rr::{Name, RData, RecordType};

use zonecrab::dns::InMemoryLookup;
use zonecrab::InMemoryZoneSource;

// --- Constants ---

pub const ZONE_NAME: &str = "example.com";
pub const ZONE_ID: &str = "Z0123456789ABCDEFGHIJK";
pub const TTL: u32 = 3600;

/// A zone file as an operator would keep it in version control, records in no particular order.
pub const ZONE_FILE: &str = r#"{
  "zones": [
    {
      "id": "Z0123456789ABCDEFGHIJK",
      "name": "example.com",
      "records": [
        { "id": "0123456789abcdef0123456789abcdef", "type": "TXT", "name": "@", "value": "\"v=spf1 include:_spf.example.com ~all\"" },
        { "id": "", "type": "A", "name": "www", "value": "192.0.2.1" },
        { "id": "", "type": "MX", "name": "@", "value": "10 mail" },
        { "id": "", "type": "AAAA", "name": "www", "value": "2001:db8::1" },
        { "id": "", "type": "CNAME", "name": "blog", "value": "www" },
        { "id": "", "type": "SOA", "name": "@", "value": "ns1.example.com. hostmaster.example.com. 2023010101 3600 600 86400 3600" },
        { "id": "", "type": "TXT", "name": "_dkim", "value": "\"v=DKIM1; k=rsa; \" \"p=MIIBIjAN\"" }
      ]
    },
    {
      "id": "Y0123456789ABCDEFGHIJK",
      "name": "example.org",
      "records": [
        { "id": "", "type": "A", "name": "@", "value": "198.51.100.7" }
      ]
    }
  ]
}"#;

// --- Helpers ---

pub fn zone_source() -> InMemoryZoneSource {
    serde_json::from_str(ZONE_FILE).expect("zone file should be valid")
}

pub fn name(s: &str) -> Name {
    Name::from_str(s).expect("valid name")
}

/// Live DNS for `example.com` publishing exactly what [`ZONE_FILE`] intends.
pub fn live_example_com() -> InMemoryLookup {
    InMemoryLookup::new()
        .with_records(
            "www.example.com",
            RecordType::A,
            TTL,
            vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))],
        )
        .with_records(
            "www.example.com",
            RecordType::AAAA,
            TTL,
            vec![RData::AAAA(Ipv6Addr::from_str("2001:db8::1").expect("valid address"))],
        )
        .with_records(
            "example.com",
            RecordType::MX,
            TTL,
            vec![RData::MX(MX::new(10, name("mail.example.com.")))],
        )
        .with_records(
            "example.com",
            RecordType::TXT,
            TTL,
            vec![RData::TXT(TXT::new(vec![
                "v=spf1 include:_spf.example.com ~all".to_string(),
            ]))],
        )
        .with_records(
            "blog.example.com",
            RecordType::CNAME,
            TTL,
            vec![RData::CNAME(name("www.example.com."))],
        )
        .with_records(
            "_dkim.example.com",
            RecordType::TXT,
            TTL,
            vec![RData::TXT(TXT::new(vec![
                "v=DKIM1; k=rsa; p=MIIBIjAN".to_string(),
            ]))],
        )
}
