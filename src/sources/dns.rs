use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};
use std::net::IpAddr;
use tracing::{debug, warn};

use super::DnsResolver;

pub struct SystemDnsResolver {
    resolver: TokioAsyncResolver,
}

impl SystemDnsResolver {
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!("System resolver config unavailable ({}), using defaults", e);
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

impl Default for SystemDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for SystemDnsResolver {
    async fn resolve(&self, domain: &str) -> Option<IpAddr> {
        let host = crate::context::host_without_port(domain);
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => lookup.iter().next(),
            Err(e) => {
                debug!("DNS lookup for {} failed: {}", host, e);
                None
            }
        }
    }
}
