//! 사용자 세션 옵션

use crate::error::NewSessionError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

fn default_true() -> bool {
    true
}

/// 프록시 종류 (닫힌 열거형)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProxyType {
    #[default]
    None,
    Http,
    Socks5,
}

impl FromStr for ProxyType {
    type Err = NewSessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ProxyType::None),
            "http" => Ok(ProxyType::Http),
            "socks5" | "socks" => Ok(ProxyType::Socks5),
            _ => Err(NewSessionError::InvalidProxyType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ProxyType {
    type Error = NewSessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// C API 호환 숫자 코드 (0 = none, 1 = http, 2 = socks5)
impl TryFrom<u8> for ProxyType {
    type Error = NewSessionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ProxyType::None),
            1 => Ok(ProxyType::Http),
            2 => Ok(ProxyType::Socks5),
            other => Err(NewSessionError::InvalidProxyType(other.to_string())),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::None => write!(f, "none"),
            ProxyType::Http => write!(f, "http"),
            ProxyType::Socks5 => write!(f, "socks5"),
        }
    }
}

/// 세션 생성 옵션
///
/// 모든 필드는 생략 가능하며 기본값은 IPv6 on, UDP on, 프록시 없음입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    #[serde(default = "default_true")]
    pub ipv6_enabled: bool,
    #[serde(default = "default_true")]
    pub udp_enabled: bool,
    #[serde(default)]
    pub proxy_type: ProxyType,
    #[serde(default)]
    pub proxy_address: String,
    #[serde(default)]
    pub proxy_port: u16,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ipv6_enabled: true,
            udp_enabled: true,
            proxy_type: ProxyType::None,
            proxy_address: String::new(),
            proxy_port: 0,
        }
    }
}

impl SessionOptions {
    /// 환경 변수에서 옵션 로드
    ///
    /// 설정되지 않은 값은 기본값을 사용합니다. 해석할 수 없는 값은 기본값으로 대체하지 않고 에러입니다.
    pub fn from_env() -> Result<Self, NewSessionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 조회 함수로 옵션 로드 (`TOX_*` 키 사용)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NewSessionError> {
        let defaults = Self::default();

        let proxy_type = match lookup("TOX_PROXY_TYPE") {
            Some(value) => value.parse()?,
            None => defaults.proxy_type,
        };

        let proxy_port = match lookup("TOX_PROXY_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| NewSessionError::InvalidOption {
                    key: "TOX_PROXY_PORT",
                    value,
                })?,
            None => defaults.proxy_port,
        };

        Ok(Self {
            ipv6_enabled: flag(&lookup, "TOX_IPV6_ENABLED")?.unwrap_or(defaults.ipv6_enabled),
            udp_enabled: flag(&lookup, "TOX_UDP_ENABLED")?.unwrap_or(defaults.udp_enabled),
            proxy_type,
            proxy_address: lookup("TOX_PROXY_ADDRESS").unwrap_or(defaults.proxy_address),
            proxy_port,
        })
    }

    pub fn with_proxy(mut self, proxy_type: ProxyType, address: impl Into<String>, port: u16) -> Self {
        self.proxy_type = proxy_type;
        self.proxy_address = address.into();
        self.proxy_port = port;
        self
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, NewSessionError> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(NewSessionError::InvalidOption { key, value }),
    }
}
