//! Authoritative resolver construction.
use crate::dns::{DnsLookup, DynLookup, LookupError, RecordSet};
use crate::error::Error;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use trust_dns_proto::rr::{Name, RData, RecordType};
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::lookup::Lookup;
use trust_dns_resolver::TokioAsyncResolver;

const DNS_PORT: u16 = 53;

#[async_trait::async_trait]
impl DnsLookup for TokioAsyncResolver {
    async fn lookup(&self, name: &str, rtype: RecordType) -> Result<RecordSet, LookupError> {
        // Always query the absolute name so no search domain is ever appended.
        let fqdn = Name::from_ascii(format!("{name}."))
            .map_err(|_| LookupError::InvalidName(name.to_string()))?;
        let answer = TokioAsyncResolver::lookup(self, fqdn, rtype).await?;
        record_set(&answer, rtype)
    }
}

/// The records of type `rtype` in `answer`, which may also hold the CNAME chain leading to them.
fn record_set(answer: &Lookup, rtype: RecordType) -> Result<RecordSet, LookupError> {
    let ttl = answer
        .record_iter()
        .find(|record| record.record_type() == rtype)
        .map(trust_dns_proto::rr::Record::ttl);
    let rdata: Vec<RData> = answer
        .iter()
        .filter(|rdata| rdata.to_record_type() == rtype)
        .cloned()
        .collect();
    match ttl {
        Some(ttl) if !rdata.is_empty() => Ok(RecordSet { ttl, rdata }),
        _ => Err(LookupError::NotFound),
    }
}

/// A zone's authoritative nameserver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nameserver {
    /// Hostname without trailing dot.
    pub name: String,
    pub addr: Ipv4Addr,
}

/// A resolver sending every query to one zone's authoritative nameserver.
#[derive(Clone)]
pub struct AuthoritativeResolver {
    nameserver: Nameserver,
    lookup: DynLookup,
}

impl AuthoritativeResolver {
    #[must_use]
    pub fn nameserver(&self) -> &Nameserver {
        &self.nameserver
    }

    #[must_use]
    pub fn lookup(&self) -> DynLookup {
        Arc::clone(&self.lookup)
    }
}

/// Builds [`AuthoritativeResolver`]s, using a bootstrap resolver to discover each zone's
/// nameserver.
#[derive(Clone)]
pub struct ResolverFactory {
    bootstrap: DynLookup,
    opts: ResolverOpts,
}

impl ResolverFactory {
    /// `opts` apply to the authoritative resolvers built by the factory, not to `bootstrap`.
    #[must_use]
    pub fn new(bootstrap: DynLookup, opts: ResolverOpts) -> Self {
        ResolverFactory { bootstrap, opts }
    }

    /// A factory bootstrapping from the system resolver configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolver`] if the system configuration can't be read.
    pub fn from_system_conf(opts: ResolverOpts) -> Result<Self, Error> {
        let bootstrap = TokioAsyncResolver::tokio_from_system_conf()?;
        Ok(Self::new(Arc::new(bootstrap), opts))
    }

    /// A factory bootstrapping from the given recursive nameservers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolver`] if the resolver can't be constructed.
    pub fn from_nameservers(nameservers: &[IpAddr], opts: ResolverOpts) -> Result<Self, Error> {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(nameservers, DNS_PORT, true),
        );
        let bootstrap = TokioAsyncResolver::tokio(config, opts.clone())?;
        Ok(Self::new(Arc::new(bootstrap), opts))
    }

    /// Find the first nameserver listed in the `NS` records of `zone` and its IPv4 address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionSetup`] if either lookup fails, [`Error::NoNameservers`] or
    /// [`Error::NoNameserverAddress`] if an answer holds no usable record.
    pub async fn nameserver_for(&self, zone: &str) -> Result<Nameserver, Error> {
        let setup_failed = |source| Error::ResolutionSetup {
            zone: zone.to_string(),
            source,
        };

        let ns_set = self
            .bootstrap
            .lookup(zone, RecordType::NS)
            .await
            .map_err(setup_failed)?;
        let name = ns_set
            .rdata
            .iter()
            .find_map(|rdata| match rdata {
                RData::NS(name) => Some(name.to_string()),
                _ => None,
            })
            .ok_or_else(|| Error::NoNameservers(zone.to_string()))?;
        let name = name.strip_suffix('.').unwrap_or(&name).to_string();

        let a_set = self
            .bootstrap
            .lookup(&name, RecordType::A)
            .await
            .map_err(setup_failed)?;
        let addr = a_set
            .rdata
            .iter()
            .find_map(|rdata| match rdata {
                RData::A(addr) => Some(*addr),
                _ => None,
            })
            .ok_or_else(|| Error::NoNameserverAddress {
                zone: zone.to_string(),
                nameserver: name.clone(),
            })?;

        tracing::debug!("authoritative nameserver for {zone} is {name} ({addr})");
        Ok(Nameserver { name, addr })
    }

    /// Build a resolver querying the authoritative nameserver of `zone` directly.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ResolverFactory::nameserver_for`], or [`Error::Resolver`] if the
    /// resolver can't be constructed.
    pub async fn for_zone(&self, zone: &str) -> Result<AuthoritativeResolver, Error> {
        let nameserver = self.nameserver_for(zone).await?;
        let config = authoritative_config(nameserver.addr);
        let resolver = TokioAsyncResolver::tokio(config, self.opts.clone())?;
        Ok(AuthoritativeResolver {
            nameserver,
            lookup: Arc::new(resolver),
        })
    }
}

/// Resolver configuration sending all queries, over UDP and TCP, to `addr` only.
#[must_use]
pub fn authoritative_config(addr: Ipv4Addr) -> ResolverConfig {
    ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[IpAddr::V4(addr)], DNS_PORT, true),
    )
}

/// Resolver options for drift checks.
#[must_use]
pub fn check_opts(timeout: std::time::Duration, attempts: usize) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = attempts;
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::memory::Answer;
    use crate::dns::InMemoryLookup;
    use std::net::SocketAddr;
    use std::str::FromStr;
    use std::time::Duration;
    use trust_dns_proto::op::Query;

    fn factory(bootstrap: InMemoryLookup) -> (ResolverFactory, Arc<InMemoryLookup>) {
        let bootstrap = Arc::new(bootstrap);
        let factory = ResolverFactory::new(bootstrap.clone(), ResolverOpts::default());
        (factory, bootstrap)
    }

    fn cname(name: &str) -> RData {
        RData::CNAME(Name::from_str(name).unwrap())
    }

    fn ns(name: &str) -> RData {
        RData::NS(Name::from_str(name).unwrap())
    }

    #[tokio::test]
    async fn discovers_first_nameserver() {
        let (factory, bootstrap) = factory(
            InMemoryLookup::new()
                .with_records(
                    "example.com",
                    RecordType::NS,
                    3600,
                    vec![ns("ns1.example.com."), ns("ns2.example.com.")],
                )
                .with_records(
                    "ns1.example.com",
                    RecordType::A,
                    3600,
                    vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))],
                ),
        );

        let nameserver = factory.nameserver_for("example.com").await.unwrap();
        assert_eq!(
            nameserver,
            Nameserver {
                name: "ns1.example.com".to_string(),
                addr: Ipv4Addr::new(192, 0, 2, 1),
            }
        );
        assert_eq!(
            bootstrap.queries(),
            vec![
                ("example.com".to_string(), RecordType::NS),
                ("ns1.example.com".to_string(), RecordType::A),
            ]
        );
    }

    #[tokio::test]
    async fn missing_ns_records_fail_setup() {
        let (factory, bootstrap) = factory(InMemoryLookup::new());
        let err = factory.nameserver_for("example.com").await.unwrap_err();
        assert!(matches!(
            err,
            Error::ResolutionSetup {
                source: LookupError::NotFound,
                ..
            }
        ));
        assert_eq!(bootstrap.queries().len(), 1);
    }

    #[tokio::test]
    async fn unresolvable_nameserver_fails_setup() {
        let (factory, _) = factory(
            InMemoryLookup::new()
                .with_records("example.com", RecordType::NS, 3600, vec![ns("ns1.example.net.")])
                .with_answer("ns1.example.net", RecordType::A, Answer::Timeout),
        );
        let err = factory.nameserver_for("example.com").await.unwrap_err();
        assert!(matches!(
            err,
            Error::ResolutionSetup {
                source: LookupError::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn ns_answer_without_ns_rdata_fails_setup() {
        let (factory, _) = factory(InMemoryLookup::new().with_records(
            "example.com",
            RecordType::NS,
            3600,
            vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))],
        ));
        assert!(matches!(
            factory.nameserver_for("example.com").await,
            Err(Error::NoNameservers(zone)) if zone == "example.com"
        ));
    }

    #[tokio::test]
    async fn builds_resolver_for_discovered_nameserver() {
        let (factory, _) = factory(
            InMemoryLookup::new()
                .with_records("example.com", RecordType::NS, 60, vec![ns("ns1.example.com.")])
                .with_records(
                    "ns1.example.com",
                    RecordType::A,
                    60,
                    vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))],
                ),
        );
        let resolver = factory.for_zone("example.com").await.unwrap();
        assert_eq!(resolver.nameserver().addr, Ipv4Addr::new(192, 0, 2, 1));
    }

    #[test]
    fn authoritative_config_targets_only_the_nameserver() {
        let config = authoritative_config(Ipv4Addr::new(192, 0, 2, 1));
        assert!(!config.name_servers().is_empty());
        for nameserver in config.name_servers() {
            assert_eq!(
                nameserver.socket_addr,
                "192.0.2.1:53".parse::<SocketAddr>().unwrap()
            );
        }
        assert!(config.search().is_empty());
        assert!(config.domain().is_none());
    }

    fn answer(question: &str, rtype: RecordType, records: Vec<(&str, u32, RData)>) -> Lookup {
        let records: Vec<trust_dns_proto::rr::Record> = records
            .into_iter()
            .map(|(owner, ttl, rdata)| {
                trust_dns_proto::rr::Record::from_rdata(Name::from_str(owner).unwrap(), ttl, rdata)
            })
            .collect();
        Lookup::new_with_max_ttl(
            Query::query(Name::from_str(question).unwrap(), rtype),
            Arc::from(records),
        )
    }

    #[test]
    fn record_set_skips_cname_chain() {
        let lookup = answer(
            "www.example.com.",
            RecordType::A,
            vec![
                ("www.example.com.", 3600, cname("web.example.com.")),
                ("web.example.com.", 300, RData::A(Ipv4Addr::new(192, 0, 2, 1))),
                ("web.example.com.", 300, RData::A(Ipv4Addr::new(192, 0, 2, 2))),
            ],
        );

        let set = record_set(&lookup, RecordType::A).unwrap();
        assert_eq!(set.ttl, 300);
        assert_eq!(
            set.rdata,
            vec![
                RData::A(Ipv4Addr::new(192, 0, 2, 1)),
                RData::A(Ipv4Addr::new(192, 0, 2, 2)),
            ]
        );
    }

    #[test]
    fn cname_chain_alone_is_not_found() {
        let lookup = answer(
            "www.example.com.",
            RecordType::A,
            vec![("www.example.com.", 3600, cname("web.example.com."))],
        );
        assert!(matches!(record_set(&lookup, RecordType::A), Err(LookupError::NotFound)));
    }

    #[test]
    fn cname_answer_keeps_cname() {
        let lookup = answer(
            "blog.example.com.",
            RecordType::CNAME,
            vec![("blog.example.com.", 600, cname("www.example.com."))],
        );
        let set = record_set(&lookup, RecordType::CNAME).unwrap();
        assert_eq!(set.ttl, 600);
        assert_eq!(set.rdata.len(), 1);
    }

    #[test]
    fn check_opts_apply_timeout_and_attempts() {
        let opts = check_opts(Duration::from_secs(3), 4);
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert_eq!(opts.attempts, 4);
    }
}
