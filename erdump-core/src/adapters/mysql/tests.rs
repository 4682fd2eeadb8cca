//! Unit tests for the MySQL adapter that need no running server.

#![allow(clippy::unwrap_used)]

use super::{MySqlSource, connect_options};
use crate::config::DatabaseConfig;
use crate::error::ErdumpError;
use std::time::Duration;

const SENSITIVE_PASSWORD: &str = "super_secret_password_123";
const MYSQL_PORT: u16 = 3306;

#[test]
fn test_connect_options_from_config() {
    let config = DatabaseConfig::new("db.internal", 13306, "shop", "reader", SENSITIVE_PASSWORD);
    let options = connect_options(&config);

    assert_eq!(options.get_host(), "db.internal");
    assert_eq!(options.get_port(), 13306);
    assert_eq!(options.get_username(), "reader");
    assert_eq!(options.get_database(), Some("shop"));
}

#[tokio::test]
async fn test_connect_rejects_invalid_config_before_network() {
    let config = DatabaseConfig::new("", MYSQL_PORT, "shop", "reader", SENSITIVE_PASSWORD);
    let error = MySqlSource::connect(&config).await.unwrap_err();
    assert!(error.is_configuration());
}

#[tokio::test]
async fn test_connect_refused_is_connection_error() {
    // Port 1 on loopback is never a MySQL server.
    let config = DatabaseConfig::new("127.0.0.1", 1, "shop", "reader", SENSITIVE_PASSWORD)
        .with_connect_timeout(Duration::from_secs(2));

    let error = MySqlSource::connect(&config).await.unwrap_err();
    assert!(matches!(error, ErdumpError::Connection { .. }));

    let message = format!("{} {:?}", error, error);
    assert!(
        !message.contains(SENSITIVE_PASSWORD),
        "Password leaked in error message: {}",
        message
    );
    assert!(message.contains("127.0.0.1:1/shop"));
}

#[tokio::test]
async fn test_debug_shows_target_without_credentials() {
    let config = DatabaseConfig::new("db.internal", 13306, "shop", "reader", SENSITIVE_PASSWORD);
    let pool = sqlx::mysql::MySqlPoolOptions::new().connect_lazy_with(connect_options(&config));
    let source = MySqlSource::from_pool(pool, "db.internal:13306/shop");

    let debug = format!("{:?}", source);
    assert!(debug.contains("db.internal:13306/shop"));
    assert!(!debug.contains(SENSITIVE_PASSWORD));
}
