//! 네트워크 주소 모델 및 해석

pub mod endpoint;
pub mod resolve;

pub use endpoint::{is_lan_ip, AddressFamily, Endpoint, ResolvedAddressPair};
pub use resolve::{parse_literal, resolve_or_parse, AddressResolver, DnsResolver, SystemResolver};
