use crate::check::{CheckContext, CheckResult, Verdict};
use crate::dns::{DnsLookup, LookupError};
use crate::error::Error;
use crate::model::{grammar, Record, RecordType};
use crate::normalize::{concat_txt, expected_hostname};
use std::net::IpAddr;
use trust_dns_proto::rr::{Name, RData};

/// Compare one record of zone `zone_name` with the answer `resolver` gives for it.
///
/// # Errors
///
/// Returns [`Error::NotCheckable`] for `SOA` records, [`Error::Cancelled`] if `ctx` is cancelled
/// before the answer arrives, and [`Error::Query`] if the query failed for any reason other
/// than the record not existing.
pub async fn check_record(
    ctx: &CheckContext,
    record: &Record,
    zone_name: &str,
    resolver: &(dyn DnsLookup + Send + Sync),
) -> Result<CheckResult, Error> {
    let rtype = record.rtype();
    if !rtype.is_checkable() {
        return Err(Error::NotCheckable(rtype));
    }
    if ctx.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let fqdn = record.fqdn(zone_name);
    let expected = expected_value(record, zone_name);
    let answer = tokio::select! {
        () = ctx.cancelled() => return Err(Error::Cancelled),
        answer = resolver.lookup(&fqdn, rtype.query_type()) => answer,
    };

    match answer {
        Ok(set) => {
            let found = set
                .rdata
                .iter()
                .filter_map(live_value)
                .any(|live| live == expected);
            let verdict = if found {
                Verdict::Match
            } else {
                Verdict::Mismatch
            };
            Ok(CheckResult {
                verdict,
                ttl: Some(set.ttl),
            })
        }
        Err(LookupError::NotFound) => Ok(CheckResult::missing()),
        Err(source) => Err(Error::Query {
            fqdn,
            rtype,
            source,
        }),
    }
}

/// The intended value of `record` in the form live answers are compared in.
fn expected_value(record: &Record, zone_name: &str) -> String {
    let value = record.value();
    match record.rtype() {
        RecordType::A | RecordType::AAAA => value
            .parse::<IpAddr>()
            .map_or_else(|_| value.to_string(), |addr| addr.to_string()),
        RecordType::CNAME | RecordType::NS | RecordType::PTR => host(value, zone_name),
        RecordType::MX => match grammar::parse_mx(value) {
            Ok((preference, exchange)) => {
                format!("{preference} {}", host(exchange, zone_name))
            }
            Err(_) => value.to_string(),
        },
        RecordType::SRV => match value.split_whitespace().collect::<Vec<_>>()[..] {
            [priority, weight, port, target] => format!(
                "{priority} {weight} {port} {}",
                host(target, zone_name)
            ),
            _ => value.to_string(),
        },
        RecordType::TXT => concat_txt(value, true).into_owned(),
        RecordType::CAA | RecordType::SOA => value.to_string(),
    }
}

/// A live record in the form intended values are compared in.
fn live_value(rdata: &RData) -> Option<String> {
    let value = match rdata {
        RData::A(addr) => addr.to_string(),
        RData::AAAA(addr) => addr.to_string(),
        RData::CNAME(name) | RData::NS(name) | RData::PTR(name) => hostname(name),
        RData::MX(mx) => format!("{} {}", mx.preference(), hostname(mx.exchange())),
        RData::SRV(srv) => format!(
            "{} {} {} {}",
            srv.priority(),
            srv.weight(),
            srv.port(),
            hostname(srv.target())
        ),
        RData::TXT(txt) => {
            let joined: String = txt
                .txt_data()
                .iter()
                .map(|segment| String::from_utf8_lossy(segment))
                .collect();
            format!("\"{}\"", escape_txt(&joined))
        }
        RData::SOA(_) => return None,
        other => other.to_string(),
    };
    Some(value)
}

// DNS names compare case-insensitively.
fn host(value: &str, zone_name: &str) -> String {
    expected_hostname(value, zone_name).to_ascii_lowercase()
}

fn hostname(name: &Name) -> String {
    let mut host = name.to_ascii().to_ascii_lowercase();
    if host.ends_with('.') {
        host.pop();
    }
    host
}

// Zone data writes TXT strings in presentation form, with quotes and backslashes escaped.
fn escape_txt(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
