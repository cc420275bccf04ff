//! 주소 해석 엔진
//!
//! 텍스트 주소(리터럴 IP 또는 호스트명)를 하나 또는 두 개의 엔드포인트로 변환합니다.
//! 리터럴 파싱을 항상 먼저 시도하며, DNS는 UDP가 활성화된 세션에서만 사용합니다.

use super::endpoint::{AddressFamily, Endpoint, ResolvedAddressPair};
use crate::error::ResolveError;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::Arc;
use tracing::{debug, trace};

/// DNS 조회 서비스
///
/// 블로킹 호출입니다. 타임아웃은 구현체의 책임입니다.
pub trait DnsResolver: Send + Sync {
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// OS 리졸버 (getaddrinfo)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl DnsResolver for SystemResolver {
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = (host, 0u16).to_socket_addrs()?;
        Ok(addrs.map(|a| a.ip()).collect())
    }
}

/// 리터럴 IPv4/IPv6 파싱 (I/O 없음)
pub fn parse_literal(text: &str) -> Option<IpAddr> {
    text.parse::<IpAddr>().ok()
}

/// DNS 결과에서 요청 패밀리에 맞는 엔드포인트 선택
///
/// `Unspecified`일 때는 IPv6를 primary로 우선하고, `want_secondary`면 IPv4를 secondary에 담습니다.
/// secondary를 못 채우는 것은 실패가 아닙니다.
pub fn select_pair(
    ips: &[IpAddr],
    family: AddressFamily,
    want_secondary: bool,
) -> Option<ResolvedAddressPair> {
    let first = |wanted: AddressFamily| ips.iter().copied().find(|ip| wanted.accepts(ip));

    match family {
        AddressFamily::Ipv4 | AddressFamily::Ipv6 => first(family)
            .map(|ip| ResolvedAddressPair::single(Endpoint::from_ip(ip))),
        AddressFamily::Unspecified => match (first(AddressFamily::Ipv6), first(AddressFamily::Ipv4)) {
            (Some(v6), v4) => Some(ResolvedAddressPair {
                primary: Endpoint::from_ip(v6),
                secondary: if want_secondary {
                    v4.map(Endpoint::from_ip)
                } else {
                    None
                },
            }),
            (None, Some(v4)) => Some(ResolvedAddressPair::single(Endpoint::from_ip(v4))),
            (None, None) => None,
        },
    }
}

/// 리터럴 → DNS 순서로 해석 (UDP 게이트 없음)
///
/// 세션 생성 시 프록시 호스트 검증에 사용합니다.
pub fn resolve_or_parse(
    dns: &dyn DnsResolver,
    address: &str,
    family: AddressFamily,
) -> Result<Endpoint, ResolveError> {
    if let Some(ip) = parse_literal(address) {
        return Ok(Endpoint::from_ip(ip));
    }
    if address.is_empty() {
        return Err(ResolveError::BadAddress(address.to_string()));
    }

    let ips = dns
        .lookup_host(address)
        .map_err(|_| ResolveError::BadAddress(address.to_string()))?;

    select_pair(&ips, family, false)
        .map(|pair| pair.primary)
        .ok_or_else(|| ResolveError::BadAddress(address.to_string()))
}

/// 세션 정책이 적용된 주소 해석기
#[derive(Clone)]
pub struct AddressResolver {
    dns: Arc<dyn DnsResolver>,
    ipv6_enabled: bool,
    udp_enabled: bool,
}

impl AddressResolver {
    pub fn new(dns: Arc<dyn DnsResolver>, ipv6_enabled: bool, udp_enabled: bool) -> Self {
        Self {
            dns,
            ipv6_enabled,
            udp_enabled,
        }
    }

    /// 주소 해석 (호출당 정확히 한 번 시도, 재시도 없음)
    ///
    /// 포트는 붙이지 않습니다. 호출자가 해석 성공 후 붙입니다.
    pub fn resolve(
        &self,
        address: &str,
        want_secondary: bool,
    ) -> Result<ResolvedAddressPair, ResolveError> {
        if let Some(ip) = parse_literal(address) {
            trace!("리터럴 주소: {}", ip);
            return Ok(ResolvedAddressPair::single(Endpoint::from_ip(ip)));
        }

        if address.is_empty() {
            return Err(ResolveError::BadAddress(address.to_string()));
        }

        // UDP 비활성 세션은 TCP 릴레이만 사용하므로 DNS를 쓰지 않음
        if !self.udp_enabled {
            debug!("UDP 비활성: DNS 조회 생략 ({})", address);
            return Err(ResolveError::Unavailable(address.to_string()));
        }

        let dual_stack = self.ipv6_enabled && want_secondary;
        let family = if dual_stack {
            AddressFamily::Unspecified
        } else {
            AddressFamily::for_session(self.ipv6_enabled)
        };

        let ips = self.dns.lookup_host(address).map_err(|e| {
            debug!("DNS 조회 실패 {}: {}", address, e);
            ResolveError::BadAddress(address.to_string())
        })?;

        let pair = select_pair(&ips, family, dual_stack)
            .ok_or_else(|| ResolveError::BadAddress(address.to_string()))?;

        debug!(
            "DNS 해석: {} -> {} (secondary: {:?})",
            address,
            pair.primary.ip(),
            pair.secondary.map(|e| e.ip())
        );
        Ok(pair)
    }
}
