//! Offline unit tests for orderlink-db pool configuration and row types.
//! These tests do not require a live database connection.

use orderlink_core::{AppConfig, Environment};
use orderlink_db::{OrderRow, PoolConfig};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "mysql://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        catalog_path: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        http_timeout_secs: 30,
        http_user_agent: "ua".to_string(),
        max_retries: 3,
        retry_backoff_base_ms: 1000,
        submit_delay_ms: 1000,
        order_lookback_hours: 24,
        dispatch_batch_size: 10,
        schedule: "0 * * * * *".to_string(),
        naver_api_base_url: "https://api.commerce.naver.com/external".to_string(),
        naver_client_id: None,
        naver_client_secret: None,
        joytel_api_base_url: "https://api.joytelshop.com".to_string(),
        joytel_customer_code: None,
        joytel_customer_auth: None,
        joytel_warehouse: String::new(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`OrderRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn order_row_has_expected_fields() {
    use chrono::Utc;

    let row = OrderRow {
        id: 1_i64,
        product_order_id: "2025010112345601".to_string(),
        order_id: "2025010198765401".to_string(),
        orderer_name: "홍길동".to_string(),
        orderer_tel: "01012345678".to_string(),
        email: "buyer@example.com".to_string(),
        product_name: "[일본] 5G 매일 2기가 후 무제한(저속)".to_string(),
        day: 3_i64,
        quantity: 1_i64,
        product_code: None,
        order_tid: None,
        needs_review: false,
        kakao_send_yn: "N".to_string(),
        dispatch_status: 0_i32,
        created_at: Utc::now(),
        updated_at: None,
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.day, 3);
    assert!(row.order_tid.is_none());
    assert!(!row.needs_review);
    assert_eq!(row.dispatch_status, 0);
}
