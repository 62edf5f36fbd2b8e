#![allow(clippy::unwrap_used)]
// File + environment layering. Every test runs inside a `Jail` so that
// environment changes never leak between tests.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;

use omada_config::{ConfigError, load_config};
use omada_core::TlsVerification;

#[test]
fn test_file_values_override_defaults() {
    Jail::expect_with(|_| {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
url = "https://10.0.0.2:8043"
username = "admin"
password = "from-file"
timeout = 9
listen = "127.0.0.1:9000"
insecure = false
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.url.as_deref(), Some("https://10.0.0.2:8043"));
        assert_eq!(config.timeout, 9);
        assert_eq!(config.pipeline_timeout, 30);
        assert_eq!(config.listen, "127.0.0.1:9000");

        let controller = config.controller_config().unwrap();
        assert_eq!(controller.timeout, Duration::from_secs(9));
        assert_eq!(controller.tls, TlsVerification::SystemDefaults);
        Ok(())
    });
}

#[test]
fn test_missing_file_uses_defaults() {
    Jail::expect_with(|_| {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.timeout, 5);
        assert_eq!(config.listen, "0.0.0.0:8080");
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "timeout = \"soon\"")?;
        assert!(matches!(
            load_config(Some(Path::new("config.toml"))),
            Err(ConfigError::Figment(_))
        ));
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
url = "https://file:8043"
username = "admin"
pipeline_timeout = 10
"#,
        )?;
        jail.set_env("OMADA_URL", "https://env:8043");
        jail.set_env("OMADA_PASSWORD", "from-env");
        jail.set_env("OMADA_PIPELINE_TIMEOUT", "12");

        let config = load_config(Some(Path::new("config.toml"))).map_err(|e| e.to_string())?;
        assert_eq!(config.url.as_deref(), Some("https://env:8043"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.pipeline_timeout, 12);

        let controller = config.controller_config().map_err(|e| e.to_string())?;
        assert_eq!(controller.pipeline_timeout, Duration::from_secs(12));
        Ok(())
    });
}
