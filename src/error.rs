//! 세션 에러 타입
//!
//! 모든 실패는 호출자에게 값으로 반환됩니다. 재시도나 로깅으로 대체하지 않습니다.

use serde::Serialize;
use thiserror::Error;

/// 에러 분류 (호출자가 대응 방식을 결정하는 단위)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 필수 입력이 비어 있거나 잘못됨
    InvalidArgument,
    /// 세션 생성 시 설정 오류
    InvalidConfiguration,
    /// 리터럴 파싱과 DNS 모두 실패, 또는 DNS 사용 불가
    AddressUnresolvable,
    /// 하위 서브시스템이 엔드포인트/키를 거부
    RegistrationFailed,
}

/// 세션 생성 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewSessionError {
    #[error("unrecognized proxy type: {0}")]
    InvalidProxyType(String),

    #[error("proxy port must not be 0")]
    ProxyBadPort,

    #[error("proxy host could not be resolved: {0:?}")]
    ProxyBadHost(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidOption { key: &'static str, value: String },

    #[error("saved data is encrypted")]
    LoadEncrypted,
}

impl NewSessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewSessionError::LoadEncrypted => ErrorKind::InvalidArgument,
            NewSessionError::InvalidProxyType(_)
            | NewSessionError::ProxyBadPort
            | NewSessionError::ProxyBadHost(_)
            | NewSessionError::InvalidOption { .. } => ErrorKind::InvalidConfiguration,
        }
    }
}

/// 주소 해석 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// 리터럴 IP도 아니고 DNS 조회도 실패
    #[error("bad address: {0:?}")]
    BadAddress(String),

    /// UDP 비활성 세션에서는 DNS를 사용하지 않음
    #[error("DNS resolution unavailable with UDP disabled: {0:?}")]
    Unavailable(String),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::AddressUnresolvable
    }
}

/// 외부 서브시스템의 등록 거부
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("registration rejected: {reason}")]
pub struct RegistrationError {
    pub reason: String,
}

impl RegistrationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// `BootstrapError::BadAddress`의 원인
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BadAddressCause {
    #[error(transparent)]
    Unresolvable(#[from] ResolveError),

    #[error("DHT {0}")]
    DhtRejected(#[from] RegistrationError),
}

/// 부트스트랩/릴레이 등록 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("address and public key are required: {0}")]
    Null(&'static str),

    #[error("port must not be 0")]
    BadPort,

    #[error("bad bootstrap address: {0}")]
    BadAddress(#[from] BadAddressCause),
}

impl BootstrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BootstrapError::Null(_) | BootstrapError::BadPort => ErrorKind::InvalidArgument,
            BootstrapError::BadAddress(BadAddressCause::Unresolvable(_)) => {
                ErrorKind::AddressUnresolvable
            }
            BootstrapError::BadAddress(BadAddressCause::DhtRejected(_)) => {
                ErrorKind::RegistrationFailed
            }
        }
    }
}

impl From<ResolveError> for BootstrapError {
    fn from(e: ResolveError) -> Self {
        BootstrapError::BadAddress(BadAddressCause::Unresolvable(e))
    }
}

impl From<RegistrationError> for BootstrapError {
    fn from(e: RegistrationError) -> Self {
        BootstrapError::BadAddress(BadAddressCause::DhtRejected(e))
    }
}
