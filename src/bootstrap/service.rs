use crate::bootstrap::{DhtBootstrap, OnionPaths, StatsCollector, TcpRelays};
use crate::error::{BootstrapError, ResolveError};
use crate::key::PublicKey;
use crate::net::{AddressResolver, ResolvedAddressPair};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 부트스트랩 오케스트레이터
///
/// 주소 해석 후 TCP 릴레이/어니언 경로에 항상 등록하고, UDP가 켜져 있으면 DHT에도 등록합니다.
pub struct BootstrapService {
    resolver: AddressResolver,
    ipv6_enabled: bool,
    udp_enabled: bool,
    dht: Arc<dyn DhtBootstrap>,
    relays: Arc<dyn TcpRelays>,
    onion: Arc<dyn OnionPaths>,
    stats: StatsCollector,
}

impl BootstrapService {
    pub fn new(
        resolver: AddressResolver,
        ipv6_enabled: bool,
        udp_enabled: bool,
        dht: Arc<dyn DhtBootstrap>,
        relays: Arc<dyn TcpRelays>,
        onion: Arc<dyn OnionPaths>,
    ) -> Self {
        Self {
            resolver,
            ipv6_enabled,
            udp_enabled,
            dht,
            relays,
            onion,
            stats: StatsCollector::new(),
        }
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// DHT 부트스트랩 노드 + TCP 릴레이로 등록
    ///
    /// TCP 릴레이 등록 후 DHT가 거부하면 전체 호출은 실패합니다.
    /// 이미 등록된 릴레이는 되돌리지 않습니다.
    pub fn bootstrap(
        &mut self,
        address: &str,
        port: u16,
        public_key: &[u8],
    ) -> Result<(), BootstrapError> {
        self.stats.bootstrap_calls += 1;

        let (pair, key) = self.register_relay(address, port, public_key)?;

        // DHT는 UDP 위에서만 동작
        if !self.udp_enabled {
            debug!("UDP 비활성: DHT 등록 생략 ({})", address);
            return Ok(());
        }

        if let Err(e) = self.dht.add_bootstrap_node(pair.primary, &key) {
            self.stats.dht_rejections += 1;
            warn!("DHT 부트스트랩 거부 {}: {}", pair.primary, e);
            return Err(e.into());
        }
        self.stats.dht_nodes_registered += 1;

        if let Some(secondary) = pair.secondary {
            match self.dht.add_bootstrap_node(secondary, &key) {
                Ok(()) => self.stats.dht_nodes_registered += 1,
                Err(e) => {
                    self.stats.dht_rejections += 1;
                    debug!("DHT secondary 등록 실패 {}: {}", secondary, e);
                }
            }
        }

        info!("🔗 부트스트랩 노드 등록: {} ({}:{})", pair.primary, address, port);
        Ok(())
    }

    /// TCP 릴레이로만 등록 (DHT 등록 없음)
    pub fn add_tcp_relay(
        &mut self,
        address: &str,
        port: u16,
        public_key: &[u8],
    ) -> Result<(), BootstrapError> {
        self.stats.relay_calls += 1;
        self.register_relay(address, port, public_key).map(|_| ())
    }

    fn register_relay(
        &mut self,
        address: &str,
        port: u16,
        public_key: &[u8],
    ) -> Result<(ResolvedAddressPair, PublicKey), BootstrapError> {
        if address.is_empty() {
            return Err(BootstrapError::Null("address"));
        }
        let key = PublicKey::from_slice(public_key).ok_or(BootstrapError::Null("public key"))?;

        if port == 0 {
            return Err(BootstrapError::BadPort);
        }

        // IPv6가 켜져 있으면 두 패밀리 모두 릴레이 후보로 확보
        let pair = self
            .resolver
            .resolve(address, self.ipv6_enabled)
            .map_err(|e: ResolveError| {
                self.stats.resolution_failures += 1;
                e
            })?
            .with_port(port);

        self.relays.add_tcp_relay(pair.primary, &key);
        self.onion.add_bootstrap_path(pair.primary, &key);
        self.stats.relays_registered += 1;
        self.stats.onion_paths_registered += 1;

        if let Some(secondary) = pair.secondary {
            self.relays.add_tcp_relay(secondary, &key);
            self.stats.relays_registered += 1;
        }

        debug!(
            "TCP 릴레이/어니언 경로 등록: {} (secondary: {:?})",
            pair.primary,
            pair.secondary.map(|e| e.to_string())
        );
        Ok((pair, key))
    }
}
