//! 부트스트랩 노드 목록 파싱
//!
//! 형식: `host:port:hexkey`, 쉼표로 구분. IPv6 호스트는 대괄호로 감쌉니다 (`[::1]:33445:KEY`).

use crate::key::PublicKey;
use anyhow::{anyhow, Context};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapNodeSpec {
    pub host: String,
    pub port: u16,
    pub public_key: PublicKey,
}

impl FromStr for BootstrapNodeSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().rsplitn(3, ':');
        let key = parts.next().ok_or_else(|| anyhow!("missing public key: {}", s))?;
        let port = parts.next().ok_or_else(|| anyhow!("missing port: {}", s))?;
        let host = parts.next().ok_or_else(|| anyhow!("missing host: {}", s))?;

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        Ok(Self {
            host: host.to_string(),
            port: port
                .parse()
                .with_context(|| format!("invalid port {:?} in {}", port, s))?,
            public_key: key
                .parse()
                .with_context(|| format!("invalid public key in {}", s))?,
        })
    }
}

/// 쉼표 구분 목록 파싱 (빈 항목은 건너뜀)
pub fn parse_node_list(list: &str) -> anyhow::Result<Vec<BootstrapNodeSpec>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<BootstrapNodeSpec>())
        .collect()
}
