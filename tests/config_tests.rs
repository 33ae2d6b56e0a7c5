use std::io::Write;

use tempfile::NamedTempFile;

use modsh::domain::{Limit, ListingKind};
use modsh::error::{ConfigError, Error};
use modsh::infrastructure::config::settings::Config;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("modsh-config-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn config_loads_all_sections() {
    let file = write_temp_config(
        r#"
[reddit]
api_url = "http://127.0.0.1:8080"
auth_url = "http://127.0.0.1:8080/api/v1/access_token"
user_agent = "modsh-test/0.1"

[reddit.http]
timeout_ms = 2500

[session]
page_size = 50
modlog_limit = -1
messages_limit = 20

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).expect("config loads");

    assert_eq!(config.reddit.user_agent, "modsh-test/0.1");
    assert_eq!(config.reddit.http.timeout_ms, 2500);
    assert_eq!(config.session.page_size, 50);
    assert_eq!(config.session.limit_for(ListingKind::ModLog), Limit::Unlimited);
    assert_eq!(config.session.limit_for(ListingKind::Inbox), Limit::AtMost(20));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = Config::resolve(Some(&missing)).expect_err("missing file");
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))), "{err}");
}

#[test]
fn config_rejects_unparseable_url() {
    let file = write_temp_config("[reddit]\napi_url = \"not a url\"\n");

    let err = Config::load(file.path()).expect_err("bad url");
    assert!(
        matches!(err, Error::Config(ConfigError::InvalidValue { field: "api_url", .. })),
        "{err}"
    );
}

#[test]
fn config_rejects_zero_timeout() {
    let file = write_temp_config("[reddit.http]\ntimeout_ms = 0\n");

    let err = Config::load(file.path()).expect_err("zero timeout");
    assert!(err.to_string().contains("timeout_ms"), "{err}");
}

#[test]
fn config_rejects_malformed_toml() {
    let file = write_temp_config("[session\npage_size = 10\n");

    let err = Config::load(file.path()).expect_err("malformed");
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))), "{err}");
}
