//! 세션 설정 해석
//!
//! 사용자 옵션을 검증된 `SessionConfig`로 변환합니다. 검증 실패 시 세션은 생성되지 않습니다.

use super::options::{ProxyType, SessionOptions};
use crate::error::NewSessionError;
use crate::net::{resolve_or_parse, AddressFamily, DnsResolver, Endpoint};
use serde::Serialize;
use tracing::{debug, info};

/// 검증된 프록시 서버 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyServer {
    /// 사용자가 지정한 호스트 문자열
    pub host: String,
    /// 해석된 주소 + 포트
    pub endpoint: Endpoint,
}

/// 프록시 설정
///
/// `None`이 아니면 포트는 0이 아니고 호스트는 해석 가능한 값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProxyConfig {
    None,
    Http(ProxyServer),
    Socks5(ProxyServer),
}

impl ProxyConfig {
    pub fn proxy_type(&self) -> ProxyType {
        match self {
            ProxyConfig::None => ProxyType::None,
            ProxyConfig::Http(_) => ProxyType::Http,
            ProxyConfig::Socks5(_) => ProxyType::Socks5,
        }
    }

    pub fn server(&self) -> Option<&ProxyServer> {
        match self {
            ProxyConfig::None => None,
            ProxyConfig::Http(server) | ProxyConfig::Socks5(server) => Some(server),
        }
    }
}

/// 세션 네트워크 설정 (생성 후 불변)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub ipv6_enabled: bool,
    pub udp_enabled: bool,
    pub proxy: ProxyConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ipv6_enabled: true,
            udp_enabled: true,
            proxy: ProxyConfig::None,
        }
    }
}

impl SessionConfig {
    /// 옵션 검증 및 설정 생성
    ///
    /// 옵션이 없으면 기본값을 사용합니다. 검증 순서: 프록시 종류, 포트, 호스트.
    /// 프록시 호스트 해석은 UDP 설정과 무관하게 수행됩니다.
    pub fn resolve(
        options: Option<&SessionOptions>,
        dns: &dyn DnsResolver,
    ) -> Result<Self, NewSessionError> {
        let Some(options) = options else {
            debug!("세션 옵션 없음, 기본값 사용");
            return Ok(Self::default());
        };

        let proxy = match options.proxy_type {
            ProxyType::None => ProxyConfig::None,
            ProxyType::Http => ProxyConfig::Http(Self::resolve_proxy(options)?.verify(dns)?),
            ProxyType::Socks5 => ProxyConfig::Socks5(Self::resolve_proxy(options)?.verify(dns)?),
        };

        if let Some(server) = proxy.server() {
            info!(
                "프록시 설정: {} {} ({})",
                proxy.proxy_type(),
                server.host,
                server.endpoint
            );
        }

        Ok(Self {
            ipv6_enabled: options.ipv6_enabled,
            udp_enabled: options.udp_enabled,
            proxy,
        })
    }

    fn resolve_proxy(options: &SessionOptions) -> Result<PendingProxy<'_>, NewSessionError> {
        if options.proxy_port == 0 {
            return Err(NewSessionError::ProxyBadPort);
        }

        Ok(PendingProxy {
            host: &options.proxy_address,
            port: options.proxy_port,
            family: if options.ipv6_enabled {
                AddressFamily::Unspecified
            } else {
                AddressFamily::Ipv4
            },
        })
    }
}

/// 포트 검증을 통과한 프록시 (호스트 해석 전)
struct PendingProxy<'a> {
    host: &'a str,
    port: u16,
    family: AddressFamily,
}

impl PendingProxy<'_> {
    fn verify(self, dns: &dyn DnsResolver) -> Result<ProxyServer, NewSessionError> {
        let endpoint = resolve_or_parse(dns, self.host, self.family)
            .map_err(|_| NewSessionError::ProxyBadHost(self.host.to_string()))?;

        Ok(ProxyServer {
            host: self.host.to_string(),
            endpoint: endpoint.with_port(self.port),
        })
    }
}
