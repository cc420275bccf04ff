//! 엔드포인트 모델

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// 해석 요청 주소 패밀리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    /// IPv4/IPv6 어느 쪽이든 허용 (듀얼 스택 요청)
    Unspecified,
}

impl AddressFamily {
    /// 세션의 IPv6 설정에 따른 기본 패밀리
    pub fn for_session(ipv6_enabled: bool) -> Self {
        if ipv6_enabled {
            AddressFamily::Ipv6
        } else {
            AddressFamily::Ipv4
        }
    }

    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::Ipv4 => ip.is_ipv4(),
            AddressFamily::Ipv6 => ip.is_ipv6(),
            AddressFamily::Unspecified => true,
        }
    }
}

/// 해석된 네트워크 엔드포인트 (값 타입)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    addr: SocketAddr,
}

impl Endpoint {
    /// 포트가 아직 붙지 않은 엔드포인트
    pub fn from_ip(ip: IpAddr) -> Self {
        Self {
            addr: SocketAddr::new(ip, 0),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    pub fn family(&self) -> AddressFamily {
        match self.addr {
            SocketAddr::V4(_) => AddressFamily::Ipv4,
            SocketAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// 네트워크 바이트 순서 포트
    pub fn port_be_bytes(&self) -> [u8; 2] {
        self.addr.port().to_be_bytes()
    }

    pub fn address_bytes(&self) -> Vec<u8> {
        match self.addr.ip() {
            IpAddr::V4(ip) => ip.octets().to_vec(),
            IpAddr::V6(ip) => ip.octets().to_vec(),
        }
    }

    /// 로컬/사설 네트워크에 한정된 주소인지
    pub fn is_lan(&self) -> bool {
        is_lan_ip(&self.addr.ip())
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

/// 해석 결과 (듀얼 스택 요청 시 secondary에 IPv4가 들어감)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddressPair {
    pub primary: Endpoint,
    pub secondary: Option<Endpoint>,
}

impl ResolvedAddressPair {
    pub fn single(primary: Endpoint) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_port(self, port: u16) -> Self {
        Self {
            primary: self.primary.with_port(port),
            secondary: self.secondary.map(|e| e.with_port(port)),
        }
    }
}

pub fn is_lan_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_lan_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_lan_v4(&v4),
            None => is_lan_v6(v6),
        },
    }
}

fn is_lan_v4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        // 100.64.0.0/10 (CGNAT)
        || (octets[0] == 100 && (octets[1] & 0xC0) == 64)
}

fn is_lan_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fe80::/10
        || (first & 0xFFC0) == 0xFE80
        // fc00::/7 (ULA)
        || (first & 0xFE00) == 0xFC00
}
