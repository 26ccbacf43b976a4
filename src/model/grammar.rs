//! Per-type value grammars and DNS label rules.
//!
//! Each check is a pure predicate over the raw string returning the reason for a rejection. The
//! constructors in [`record`][super::record] and [`zone`][super::zone] turn the reasons into
//! [`ValidationError`][crate::error::ValidationError]s naming the offending field.
use crate::model::RecordType;
use crate::normalize::txt_segments;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub const MAX_LABEL_LENGTH: usize = 63;

const SOA_FIELDS: usize = 7;
const SOA_TIMER_FIELDS: [&str; 5] = ["serial", "refresh", "retry", "expire", "minimum"];

pub(crate) fn check_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err("empty label".to_string());
    }
    if label.len() > MAX_LABEL_LENGTH {
        return Err(format!(
            "label {label:?} is longer than {MAX_LABEL_LENGTH} characters"
        ));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("label {label:?} contains invalid character {c:?}"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(format!("label {label:?} starts or ends with a hyphen"));
    }
    Ok(())
}

/// Check a dot separated sequence of labels. A trailing dot produces an empty final label and
/// is rejected.
pub(crate) fn check_labels(name: &str) -> Result<(), String> {
    name.split('.').try_for_each(check_label)
}

/// Check a hostname appearing in a record value, which may be absolute (trailing dot).
pub(crate) fn check_hostname(host: &str) -> Result<(), String> {
    let relative = host.strip_suffix('.').unwrap_or(host);
    if relative.is_empty() {
        return Err("hostname is empty".to_string());
    }
    check_labels(relative)
}

/// Split an MX value into its priority and exchange hostname.
pub(crate) fn parse_mx(value: &str) -> Result<(u16, &str), String> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let &[priority, exchange] = tokens.as_slice() else {
        return Err(format!(
            "MX record must have a priority and a hostname, found {} fields",
            tokens.len()
        ));
    };
    let priority: u16 = priority
        .parse()
        .map_err(|_| format!("MX priority {priority:?} must be an integer between 0 and 65535"))?;
    check_hostname(exchange).map_err(|reason| format!("invalid MX hostname: {reason}"))?;
    Ok((priority, exchange))
}

fn check_txt(value: &str) -> Result<(), String> {
    if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
        return Err("TXT record value must be enclosed in double quotes".to_string());
    }
    match txt_segments(value) {
        Some(_) => Ok(()),
        None => Err("TXT record value has unbalanced quotes".to_string()),
    }
}

fn check_soa(value: &str) -> Result<(), String> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != SOA_FIELDS {
        return Err(format!(
            "SOA record must have {SOA_FIELDS} fields, found {}",
            tokens.len()
        ));
    }
    for (field, token) in SOA_TIMER_FIELDS.iter().zip(&tokens[2..]) {
        if token.parse::<u32>().is_err() {
            return Err(format!("SOA {field} {token:?} must be an unsigned integer"));
        }
    }
    Ok(())
}

/// Check `value` against the grammar of `rtype`. `NS`, `SRV`, `CAA` and `PTR` values are opaque.
pub(crate) fn check_value(rtype: RecordType, value: &str) -> Result<(), String> {
    match rtype {
        RecordType::A => Ipv4Addr::from_str(value)
            .map(drop)
            .map_err(|_| "Invalid IPv4 address for A record".to_string()),
        RecordType::AAAA => Ipv6Addr::from_str(value)
            .map(drop)
            .map_err(|_| "Invalid IPv6 address for AAAA record".to_string()),
        RecordType::CNAME => {
            check_hostname(value).map_err(|reason| format!("Invalid CNAME target: {reason}"))
        }
        RecordType::MX => parse_mx(value).map(drop),
        RecordType::TXT => check_txt(value),
        RecordType::SOA => check_soa(value),
        RecordType::NS | RecordType::SRV | RecordType::CAA | RecordType::PTR => Ok(()),
    }
}
