use once_cell::sync::Lazy;
use std::{collections::HashSet, fs, net::IpAddr, path::Path};
use tracing::debug;

use crate::error::AppError;

// Hosting domains that show up repeatedly in phishing statistics reports.
pub const SUSPICIOUS_HOSTS: &[&str] = &[
    "at.ua",
    "usa.cc",
    "baltazarpresentes.com.br",
    "pe.hu",
    "esy.es",
    "hol.es",
    "sweddy.com",
    "myjino.ru",
    "96.lt",
    "ow.ly",
];

const SUSPICIOUS_IPS: &[&str] = &[
    "146.112.61.108", "213.174.157.151", "121.50.168.88", "192.185.217.116",
    "78.46.211.158", "181.174.165.13", "46.242.145.103", "121.50.168.40",
    "83.125.22.219", "46.242.145.98", "107.151.148.44", "107.151.148.107",
    "64.70.19.203", "199.184.144.27", "107.151.148.108", "107.151.148.109",
    "119.28.52.61", "54.83.43.69", "52.69.166.231", "216.58.192.225",
    "118.184.25.86", "67.208.74.71", "23.253.126.58", "104.239.157.210",
    "175.126.123.219", "141.8.224.221", "10.10.10.10", "43.229.108.32",
    "103.232.215.140", "69.172.201.153", "216.218.185.162", "54.225.104.146",
    "103.243.24.98", "199.59.243.120", "31.170.160.61", "213.19.128.77",
    "62.113.226.131", "208.100.26.234", "195.16.127.102", "195.16.127.157",
    "34.196.13.28", "103.224.212.222", "172.217.4.225", "54.72.9.51",
    "192.64.147.141", "198.200.56.183", "23.253.164.103", "52.48.191.26",
    "52.214.197.72", "87.98.255.18", "209.99.17.27", "216.38.62.18",
    "104.130.124.96", "47.89.58.141", "54.86.225.156", "54.82.156.19",
    "37.157.192.102", "204.11.56.48", "110.34.231.42",
];

static SUSPICIOUS_IP_SET: Lazy<HashSet<IpAddr>> = Lazy::new(|| {
    SUSPICIOUS_IPS
        .iter()
        .filter_map(|ip| ip.parse().ok())
        .collect()
});

pub fn is_suspicious_host(url: &str) -> bool {
    SUSPICIOUS_HOSTS.iter().any(|host| url.contains(host))
}

pub fn is_suspicious_ip(ip: &IpAddr) -> bool {
    SUSPICIOUS_IP_SET.contains(ip)
}

// Known URL-shortening services, one domain per line.
#[derive(Debug, Clone, Default)]
pub struct Shorteners {
    domains: Vec<String>,
}

impl Shorteners {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let shorteners = Self::parse(&content);
        debug!(
            "Loaded {} shortener domains from {}",
            shorteners.len(),
            path.display()
        );
        Ok(shorteners)
    }

    // Blank lines and `#` comments are skipped; an empty entry would
    // otherwise match every URL.
    pub fn parse(content: &str) -> Self {
        let domains = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();
        Self { domains }
    }

    pub fn matches(&self, url: &str) -> bool {
        self.domains.iter().any(|d| url.contains(d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
