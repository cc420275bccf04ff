use crate::bootstrap::{
    BootstrapService, BootstrapStats, DhtBootstrap, DhtCommand, DhtHandle, OnionHandle,
    OnionPaths, RelayRegistry, TcpRelays,
};
use crate::config::{ProxyConfig, SessionConfig, SessionOptions};
use crate::error::{BootstrapError, NewSessionError};
use crate::net::{AddressResolver, DnsResolver, SystemResolver};
use crate::status::ConnectivityStatus;
use crate::version::version_string;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 암호화된 저장 데이터의 매직 헤더
pub const ENCRYPTED_SAVE_MAGIC: &[u8; 8] = b"toxEsave";

/// 저장 상태 로더 (저장 포맷은 외부 서비스 소관)
pub trait StateLoader: Send + Sync {
    fn load(&self, data: &[u8]) -> anyhow::Result<()>;
}

/// 세션이 사용하는 외부 서비스 묶음
#[derive(Clone)]
pub struct Services {
    pub dns: Arc<dyn DnsResolver>,
    pub dht: Arc<dyn DhtBootstrap>,
    pub relays: Arc<dyn TcpRelays>,
    pub onion: Arc<dyn OnionPaths>,
    pub state_loader: Option<Arc<dyn StateLoader>>,
}

impl Services {
    pub fn new(
        dns: Arc<dyn DnsResolver>,
        dht: Arc<dyn DhtBootstrap>,
        relays: Arc<dyn TcpRelays>,
        onion: Arc<dyn OnionPaths>,
    ) -> Self {
        Self {
            dns,
            dht,
            relays,
            onion,
            state_loader: None,
        }
    }

    pub fn with_state_loader(mut self, loader: Arc<dyn StateLoader>) -> Self {
        self.state_loader = Some(loader);
        self
    }

    /// OS 리졸버 + 메모리 기반 핸들로 구성
    pub fn local(dht_queue: usize) -> (Self, LocalHandles) {
        let (dht, dht_commands) = DhtHandle::channel(dht_queue);
        let handles = LocalHandles {
            dht,
            dht_commands,
            relays: RelayRegistry::new(),
            onion: OnionHandle::new(),
        };

        let services = Self::new(
            Arc::new(SystemResolver),
            Arc::new(handles.dht.clone()),
            Arc::new(handles.relays.clone()),
            Arc::new(handles.onion.clone()),
        );
        (services, handles)
    }
}

/// `Services::local`이 만든 핸들 (엔진 쪽에서 사용)
pub struct LocalHandles {
    pub dht: DhtHandle,
    pub dht_commands: mpsc::Receiver<DhtCommand>,
    pub relays: RelayRegistry,
    pub onion: OnionHandle,
}

/// 세션 상태 스냅샷
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub version: String,
    pub connectivity: ConnectivityStatus,
    pub ipv6_enabled: bool,
    pub udp_enabled: bool,
    pub proxy: ProxyConfig,
    pub stats: BootstrapStats,
}

/// P2P 네트워크 세션
pub struct Session {
    config: SessionConfig,
    bootstrap: BootstrapService,
    dht: Arc<dyn DhtBootstrap>,
    onion: Arc<dyn OnionPaths>,
}

impl Session {
    /// 세션 생성
    ///
    /// 암호화된 저장 데이터는 거부합니다. 저장 데이터 로드 실패는 경고만 남기고 계속 진행합니다.
    pub fn new(
        options: Option<&SessionOptions>,
        savedata: Option<&[u8]>,
        services: Services,
    ) -> Result<Self, NewSessionError> {
        if let Some(data) = savedata {
            if data.starts_with(ENCRYPTED_SAVE_MAGIC) {
                return Err(NewSessionError::LoadEncrypted);
            }
        }

        let config = SessionConfig::resolve(options, services.dns.as_ref())?;

        let resolver =
            AddressResolver::new(services.dns.clone(), config.ipv6_enabled, config.udp_enabled);
        let bootstrap = BootstrapService::new(
            resolver,
            config.ipv6_enabled,
            config.udp_enabled,
            services.dht.clone(),
            services.relays.clone(),
            services.onion.clone(),
        );

        if let (Some(data), Some(loader)) = (savedata, services.state_loader.as_ref()) {
            // TODO: abort construction on a bad load once the save format is stable
            if let Err(e) = loader.load(data) {
                warn!("저장 데이터 로드 실패, 무시하고 계속: {}", e);
            } else {
                debug!("저장 데이터 로드: {} bytes", data.len());
            }
        }

        info!(
            "✅ 세션 생성 (IPv6: {}, UDP: {}, 프록시: {})",
            config.ipv6_enabled,
            config.udp_enabled,
            config.proxy.proxy_type()
        );

        Ok(Self {
            config,
            bootstrap,
            dht: services.dht,
            onion: services.onion,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// DHT 부트스트랩 노드로 등록 (TCP 릴레이 등록 포함)
    pub fn bootstrap(
        &mut self,
        address: &str,
        port: u16,
        public_key: &[u8],
    ) -> Result<(), BootstrapError> {
        self.bootstrap.bootstrap(address, port, public_key)
    }

    /// TCP 릴레이로 등록
    pub fn add_tcp_relay(
        &mut self,
        address: &str,
        port: u16,
        public_key: &[u8],
    ) -> Result<(), BootstrapError> {
        self.bootstrap.add_tcp_relay(address, port, public_key)
    }

    /// 현재 연결 상태 (매 호출마다 새로 계산)
    pub fn connectivity_status(&self) -> ConnectivityStatus {
        ConnectivityStatus::query(self.onion.as_ref(), self.dht.as_ref())
    }

    pub fn stats(&self) -> BootstrapStats {
        self.bootstrap.stats().snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            version: version_string(),
            connectivity: self.connectivity_status(),
            ipv6_enabled: self.config.ipv6_enabled,
            udp_enabled: self.config.udp_enabled,
            proxy: self.config.proxy.clone(),
            stats: self.stats(),
        }
    }
}
