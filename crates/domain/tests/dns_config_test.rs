use sipdns_domain::config::{LogFormat, UpstreamBackend};
use sipdns_domain::{CliOverrides, Config, ConfigError, IpFamily, Transport};

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.resolver.max_cname_redirects, 3);
    assert_eq!(config.resolver.transports.len(), 3);
    assert!(config
        .resolver
        .transports
        .iter()
        .all(|t| t.allows(IpFamily::V4) && t.allows(IpFamily::V6)));
    assert_eq!(config.upstream.timeout_ms, 2000);
    assert_eq!(config.upstream.backend, UpstreamBackend::Upstream);
    assert_eq!(config.upstream.servers.len(), 2);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.max_entries, 10_000);
    assert_eq!(config.cache.negative_ttl, 60);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_empty_document_uses_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.resolver.transports.len(), 3);
    assert_eq!(config.cache.max_ttl, 86_400);
}

#[test]
fn test_config_parses_transports_and_backend() {
    let toml_str = r#"
        [resolver]
        max_cname_redirects = 1

        [[resolver.transports]]
        transport = "udp"
        ipv6 = false

        [[resolver.transports]]
        transport = "tls"

        [upstream]
        servers = ["192.0.2.53:53"]
        timeout_ms = 500
        backend = "system"

        [logging]
        level = "debug"
        format = "json"
    "#;

    let config = Config::from_toml(toml_str).unwrap();

    assert_eq!(config.resolver.max_cname_redirects, 1);
    assert_eq!(config.resolver.transports[0].transport, Transport::Udp);
    assert!(config.resolver.transports[0].ipv4);
    assert!(!config.resolver.transports[0].ipv6);
    assert_eq!(config.resolver.transports[1].transport, Transport::Tls);
    assert!(config.resolver.transports[1].ipv6);
    assert_eq!(config.upstream.servers[0].port(), 53);
    assert_eq!(config.upstream.backend, UpstreamBackend::System);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_rejects_unknown_transport() {
    let toml_str = r#"
        [[resolver.transports]]
        transport = "carrier-pigeon"
    "#;
    assert!(matches!(
        Config::from_toml(toml_str),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_validate_rejects_transport_without_family() {
    let toml_str = r#"
        [[resolver.transports]]
        transport = "tcp"
        ipv4 = false
        ipv6 = false
    "#;
    let config = Config::from_toml(toml_str).unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_validate_rejects_empty_transport_list() {
    let mut config = Config::default();
    config.resolver.transports.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_inverted_ttl_bounds() {
    let mut config = Config::default();
    config.cache.min_ttl = 600;
    config.cache.max_ttl = 60;
    assert!(config.validate().is_err());
}

#[test]
fn test_system_backend_needs_no_servers() {
    let mut config = Config::default();
    config.upstream.servers.clear();
    assert!(config.validate().is_err());

    config.upstream.backend = UpstreamBackend::System;
    assert!(config.validate().is_ok());
}

#[test]
fn test_cli_overrides_applied_on_load() {
    let path = std::env::temp_dir().join(format!("sipdns-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

    let overrides = CliOverrides {
        log_level: Some("trace".to_string()),
        servers: vec!["192.0.2.1:5353".parse().unwrap()],
        system_resolver: false,
        disable_cache: true,
    };
    let config = Config::load(path.to_str(), overrides).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.upstream.servers.len(), 1);
    assert_eq!(config.upstream.servers[0].port(), 5353);
    assert!(!config.cache.enabled);
}

#[test]
fn test_load_missing_file_is_read_error() {
    let result = Config::load(Some("/nonexistent/sipdns.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}

#[test]
fn test_clamp_ttl() {
    let mut config = Config::default();
    config.cache.min_ttl = 30;
    config.cache.max_ttl = 3600;
    assert_eq!(config.cache.clamp_ttl(5), 30);
    assert_eq!(config.cache.clamp_ttl(300), 300);
    assert_eq!(config.cache.clamp_ttl(86_400), 3600);
}
