mod common;

use finance_core::config::{Config, ConfigManager};
use finance_core::currency::CurrencyCode;

#[test]
fn missing_file_yields_defaults() {
    let home = common::temp_home();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();

    let config = manager.load().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.locale, "pt-BR");
    assert_eq!(config.currency.as_str(), "BRL");
}

#[test]
fn saved_configuration_is_reloaded() {
    let home = common::temp_home();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();
    let config = Config {
        locale: "en-US".into(),
        currency: CurrencyCode::new("USD"),
        api_delay_ms: 250,
    };

    manager.save(&config).unwrap();

    assert!(manager.path().exists());
    assert_eq!(manager.load().unwrap(), config);
    assert_eq!(manager.load().unwrap().api_delay().as_millis(), 250);
}

#[test]
fn delay_is_optional_in_stored_files() {
    let home = common::temp_home();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();
    std::fs::write(manager.path(), r#"{ "locale": "pt-BR", "currency": "BRL" }"#).unwrap();

    assert_eq!(manager.load().unwrap().api_delay_ms, 0);
}
