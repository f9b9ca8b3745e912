//! Settings loading from files and the environment

use account_testkit::config::Settings;
use account_testkit::Error;
use std::env;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

// Serialise tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "OA_TEST_SERVER",
    "OA_TEST_TIMEOUT_SECS",
    "OA_TEST_SIGNED_HEADERS",
    "OA_TEST_APP_ID",
    "OA_TEST_APP_KEY",
    "OA_TEST_SIGN_HOST",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_sources() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();

    let settings = Settings::load(None).unwrap();
    assert_eq!(settings.server, "http://127.0.0.1:2021");
    assert_eq!(settings.timeout(), Duration::from_secs(300));
    assert_eq!(settings.header_prefix, "X-OA-");
    assert_eq!(settings.signed_headers, vec!["host", "date"]);
    assert!(settings.credentials().is_none());
    assert!(settings.sign_host);
}

#[test]
fn test_file_then_environment() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();

    let file = toml_file(
        r#"
server = "https://account.test:8443"
timeout_secs = 30
header_prefix = "X-ACCT-"
app_id = "from-file"
app_key = "file-key"
"#,
    );

    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(settings.server, "https://account.test:8443");
    assert_eq!(settings.timeout_secs, 30);
    assert_eq!(settings.signing_config().signature_header(), "X-ACCT-Sign");
    assert_eq!(settings.credentials(), Some(("from-file", "file-key")));

    env::set_var("OA_TEST_TIMEOUT_SECS", "45");
    env::set_var("OA_TEST_SIGNED_HEADERS", "host,date,x-request-id");
    env::set_var("OA_TEST_SIGN_HOST", "false");
    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(settings.timeout_secs, 45);
    assert!(!settings.sign_host);
    assert_eq!(settings.signed_headers, vec!["host", "date", "x-request-id"]);
    assert_eq!(settings.server, "https://account.test:8443");

    clear_env();
}

#[test]
fn test_invalid_environment_value_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("OA_TEST_TIMEOUT_SECS", "0");
    let result = Settings::load(None);
    clear_env();
    assert!(matches!(result, Err(Error::Validation { .. })));
}

#[test]
fn test_unpaired_credentials_are_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("OA_TEST_APP_ID", "only-id");
    let result = Settings::load(None);
    clear_env();
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();

    let result = Settings::load(Some(std::path::Path::new("/nonexistent/testkit.toml")));
    assert!(matches!(result, Err(Error::Config { .. })));
}
