// Session scenario tests
//
// 외부 서비스는 호출을 기록하는 스텁으로 대체합니다.
// PanicDns는 호출되는 순간 테스트를 실패시킵니다.

use super::handle::{Services, Session, StateLoader, ENCRYPTED_SAVE_MAGIC};
use crate::bootstrap::{DhtBootstrap, OnionPaths, TcpRelays};
use crate::config::{ProxyType, SessionOptions};
use crate::error::{BootstrapError, ErrorKind, NewSessionError, RegistrationError, ResolveError};
use crate::key::PublicKey;
use crate::net::{DnsResolver, Endpoint};
use crate::status::ConnectivityStatus;
use parking_lot::Mutex;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

struct PanicDns;

impl DnsResolver for PanicDns {
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        panic!("DNS collaborator invoked for {:?}", host);
    }
}

/// 어떤 이름도 해석하지 못하는 리졸버
struct FailingDns {
    calls: AtomicUsize,
}

impl DnsResolver for FailingDns {
    fn lookup_host(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid hostname"))
    }
}

#[derive(Default)]
struct Calls {
    relays: Mutex<Vec<(Endpoint, PublicKey)>>,
    paths: Mutex<Vec<(Endpoint, PublicKey)>>,
    dht: Mutex<Vec<(Endpoint, PublicKey)>>,
    reject_dht: AtomicBool,
    onion_connected: AtomicBool,
    nonlocal_peer: AtomicBool,
    nonlocal_queries: AtomicUsize,
}

impl TcpRelays for Calls {
    fn add_tcp_relay(&self, endpoint: Endpoint, public_key: &PublicKey) {
        self.relays.lock().push((endpoint, *public_key));
    }
}

impl OnionPaths for Calls {
    fn add_bootstrap_path(&self, endpoint: Endpoint, public_key: &PublicKey) {
        self.paths.lock().push((endpoint, *public_key));
    }

    fn is_connected(&self) -> bool {
        self.onion_connected.load(Ordering::SeqCst)
    }
}

impl DhtBootstrap for Calls {
    fn add_bootstrap_node(
        &self,
        endpoint: Endpoint,
        public_key: &PublicKey,
    ) -> Result<(), RegistrationError> {
        self.dht.lock().push((endpoint, *public_key));
        if self.reject_dht.load(Ordering::SeqCst) {
            return Err(RegistrationError::new("malformed key"));
        }
        Ok(())
    }

    fn has_nonlocal_peer(&self) -> bool {
        self.nonlocal_queries.fetch_add(1, Ordering::SeqCst);
        self.nonlocal_peer.load(Ordering::SeqCst)
    }
}

fn services(calls: &Arc<Calls>, dns: Arc<dyn DnsResolver>) -> Services {
    Services::new(dns, calls.clone(), calls.clone(), calls.clone())
}

fn new_session(options: Option<&SessionOptions>) -> (Session, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let session = Session::new(options, None, services(&calls, Arc::new(PanicDns)))
        .expect("session should be created");
    (session, calls)
}

const KEY: [u8; 32] = [0x42; 32];

#[test]
fn test_default_session_bootstrap_registers_everything_once() {
    let (mut session, calls) = new_session(Some(&SessionOptions::default()));
    assert!(session.config().ipv6_enabled);
    assert!(session.config().udp_enabled);

    session.bootstrap("1.2.3.4", 33445, &KEY).unwrap();

    let relays = calls.relays.lock().clone();
    let dht = calls.dht.lock().clone();
    assert_eq!(relays.len(), 1, "relay registered exactly once");
    assert_eq!(dht.len(), 1, "DHT registered exactly once");
    assert_eq!(calls.paths.lock().len(), 1);

    for (endpoint, key) in relays.iter().chain(dht.iter()) {
        assert_eq!(endpoint.ip(), "1.2.3.4".parse::<IpAddr>().unwrap());
        assert_eq!(endpoint.port_be_bytes(), 33445u16.to_be_bytes());
        assert_eq!(endpoint.port_be_bytes(), [0x82, 0xA5]);
        assert_eq!(key.as_bytes(), &KEY);
    }
}

#[test]
fn test_udp_disabled_skips_dht() {
    let options = SessionOptions {
        udp_enabled: false,
        ..Default::default()
    };
    let (mut session, calls) = new_session(Some(&options));

    session.bootstrap("1.2.3.4", 33445, &KEY).unwrap();

    assert_eq!(calls.dht.lock().len(), 0);
    assert_eq!(calls.relays.lock().len(), 1);
    assert_eq!(calls.paths.lock().len(), 1);
}

#[test]
fn test_udp_disabled_hostname_never_reaches_dns() {
    let options = SessionOptions {
        udp_enabled: false,
        ..Default::default()
    };
    let (mut session, calls) = new_session(Some(&options));

    let err = session.bootstrap("node.tox.chat", 33445, &KEY).unwrap_err();
    assert_eq!(
        err,
        BootstrapError::from(ResolveError::Unavailable("node.tox.chat".into()))
    );
    assert_eq!(err.kind(), ErrorKind::AddressUnresolvable);
    assert!(calls.relays.lock().is_empty());
}

#[test]
fn test_socks5_bad_host_fails_construction() {
    let calls = Arc::new(Calls::default());
    let dns = Arc::new(FailingDns {
        calls: AtomicUsize::new(0),
    });
    let options = SessionOptions::default().with_proxy(ProxyType::Socks5, "bad..hostname", 1080);

    let result = Session::new(Some(&options), None, services(&calls, dns.clone()));

    assert!(matches!(result, Err(NewSessionError::ProxyBadHost(_))));
    assert_eq!(dns.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_proxy_port_zero_fails_before_host_lookup() {
    let calls = Arc::new(Calls::default());
    for proxy_type in [ProxyType::Http, ProxyType::Socks5] {
        let options = SessionOptions::default().with_proxy(proxy_type, "proxy.example.org", 0);
        let result = Session::new(Some(&options), None, services(&calls, Arc::new(PanicDns)));
        assert!(matches!(result, Err(NewSessionError::ProxyBadPort)));
    }
}

#[test]
fn test_absent_options_are_defaults() {
    let (session, _calls) = new_session(None);
    let config = session.config();
    assert!(config.ipv6_enabled);
    assert!(config.udp_enabled);
    assert_eq!(config.proxy.proxy_type(), ProxyType::None);
}

#[test]
fn test_add_tcp_relay_twice_is_not_an_error() {
    let (mut session, calls) = new_session(None);

    session.add_tcp_relay("::1", 3389, &KEY).unwrap();
    session.add_tcp_relay("::1", 3389, &KEY).unwrap();

    assert_eq!(calls.relays.lock().len(), 2, "dedup belongs to the relay subsystem");
    assert_eq!(calls.dht.lock().len(), 0);
}

#[test]
fn test_dht_rejection_reports_failure_without_rollback() {
    let (mut session, calls) = new_session(None);
    calls.reject_dht.store(true, Ordering::SeqCst);

    let err = session.bootstrap("1.2.3.4", 33445, &KEY).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RegistrationFailed);
    assert_eq!(calls.relays.lock().len(), 1);
    assert_eq!(session.stats().dht_rejections, 1);
}

#[test]
fn test_argument_errors() {
    let (mut session, calls) = new_session(None);

    assert_eq!(
        session.bootstrap("", 33445, &KEY),
        Err(BootstrapError::Null("address"))
    );
    assert!(matches!(
        session.add_tcp_relay("1.2.3.4", 33445, &[]),
        Err(BootstrapError::Null(_))
    ));
    assert_eq!(
        session.bootstrap("1.2.3.4", 0, &KEY),
        Err(BootstrapError::BadPort)
    );
    assert!(calls.relays.lock().is_empty());
}

#[test]
fn test_connectivity_is_recomputed_on_every_query() {
    let (session, calls) = new_session(None);
    assert_eq!(session.connectivity_status(), ConnectivityStatus::None);
    assert_eq!(
        calls.nonlocal_queries.load(Ordering::SeqCst),
        0,
        "DHT is not asked without an onion path"
    );

    calls.onion_connected.store(true, Ordering::SeqCst);
    assert_eq!(session.connectivity_status(), ConnectivityStatus::TcpRelay);

    calls.nonlocal_peer.store(true, Ordering::SeqCst);
    assert_eq!(session.connectivity_status(), ConnectivityStatus::UdpDirect);

    calls.onion_connected.store(false, Ordering::SeqCst);
    assert_eq!(session.connectivity_status(), ConnectivityStatus::None);
}

struct RejectingLoader {
    loads: AtomicUsize,
}

impl StateLoader for RejectingLoader {
    fn load(&self, _data: &[u8]) -> anyhow::Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("bad format")
    }
}

#[test]
fn test_savedata_handling() {
    let calls = Arc::new(Calls::default());

    let mut encrypted = ENCRYPTED_SAVE_MAGIC.to_vec();
    encrypted.extend_from_slice(&[0u8; 16]);
    let result = Session::new(None, Some(encrypted.as_slice()), services(&calls, Arc::new(PanicDns)));
    assert!(matches!(result, Err(NewSessionError::LoadEncrypted)));

    // 로드 실패는 세션 생성을 막지 않음
    let loader = Arc::new(RejectingLoader {
        loads: AtomicUsize::new(0),
    });
    let services = services(&calls, Arc::new(PanicDns)).with_state_loader(loader.clone());
    let session = Session::new(None, Some(&b"garbage"[..]), services);
    assert!(session.is_ok());
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_status_snapshot_serializes() {
    let (mut session, _calls) = new_session(None);
    session.add_tcp_relay("1.2.3.4", 443, &KEY).unwrap();

    let json = serde_json::to_value(session.status()).unwrap();
    assert_eq!(json["connectivity"], "none");
    assert_eq!(json["udp_enabled"], true);
    assert_eq!(json["proxy"]["type"], "none");
    assert_eq!(json["stats"]["relay_calls"], 1);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_local_services_end_to_end() {
    let (services, mut handles) = Services::local(8);
    let mut session = Session::new(None, None, services).unwrap();

    session.bootstrap("1.2.3.4", 33445, &KEY).unwrap();

    assert_eq!(handles.relays.relay_count(), 1);
    assert_eq!(handles.onion.path_nodes().len(), 1);
    assert!(handles.dht_commands.try_recv().is_ok());

    handles.onion.set_connected(true);
    assert_eq!(session.connectivity_status(), ConnectivityStatus::TcpRelay);

    handles.dht.peer_table().mark_connected(
        PublicKey::new(KEY),
        "1.2.3.4:33445".parse::<std::net::SocketAddr>().unwrap().into(),
    );
    assert_eq!(session.connectivity_status(), ConnectivityStatus::UdpDirect);
}
