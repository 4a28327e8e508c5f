use crate::logging;
use crate::settings::{CfgDefaultKeymaps, Keymap};
use eyre::Result;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory listing in GitHub contents-API format.
    pub index_url: String,
    /// Prefix joined with an entry path to download its raw text.
    pub raw_base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            index_url: "https://api.github.com/repos/busiris2014/7506Condor1C2014/contents/datos2011/trunk/libros".to_string(),
            raw_base_url: "https://raw.githubusercontent.com/busiris2014/7506Condor1C2014/master".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub small_step: usize,
    pub large_step: usize,
    pub preview_radius: usize,
    pub hold_delay_ms: u64,
    pub expanded_window_percent: u8,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            small_step: 100,
            large_step: 1000,
            preview_radius: 25,
            hold_delay_ms: 500,
            expanded_window_percent: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub navigation: NavigationConfig,
    pub keymap: Keymap,
    keymap_user_dict: CfgDefaultKeymaps,
    filepath: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");

        if filepath.exists() {
            return Self::load_from(filepath);
        }

        // First run: write the defaults so users have something to edit
        let config = Self::with_defaults(filepath);
        config.save()?;
        Ok(config)
    }

    fn with_defaults(filepath: PathBuf) -> Self {
        let keymap_user_dict = CfgDefaultKeymaps::default();
        Self {
            catalog: CatalogConfig::default(),
            navigation: NavigationConfig::default(),
            keymap: Keymap::from_user_dict(&keymap_user_dict),
            keymap_user_dict,
            filepath,
        }
    }

    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Get the user-configured keymap dictionary (used for help menu text)
    pub fn keymap_user_dict(&self) -> &CfgDefaultKeymaps {
        &self.keymap_user_dict
    }

    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Catalog": self.catalog,
            "Navigation": self.navigation,
            "Keymap": self.keymap_user_dict,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }

    /// Load configuration from a custom path. Missing or unreadable sections keep their defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut config = Self::with_defaults(filepath);

        if !config.filepath.exists() {
            return Ok(config);
        }

        let config_str = fs::read_to_string(&config.filepath)?;
        let user_config = match serde_json::from_str::<serde_json::Value>(&config_str) {
            Ok(value) => value,
            Err(err) => {
                logging::warn(format!(
                    "Ignoring invalid configuration {}: {}",
                    config.filepath.display(),
                    err
                ));
                return Ok(config);
            }
        };

        if let Some(catalog) = section::<CatalogConfig>(&user_config, "Catalog") {
            config.catalog = catalog;
        }
        if let Some(navigation) = section::<NavigationConfig>(&user_config, "Navigation") {
            config.navigation = navigation;
        }
        if let Some(keymap) = section::<CfgDefaultKeymaps>(&user_config, "Keymap") {
            config.keymap = Keymap::from_user_dict(&keymap);
            config.keymap_user_dict = keymap;
        }

        Ok(config)
    }
}

fn section<T: DeserializeOwned>(root: &serde_json::Value, name: &str) -> Option<T> {
    let value = root.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            logging::warn(format!("Ignoring configuration section {}: {}", name, err));
            None
        }
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join("lector");
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("lector");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".lector"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".lector"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    struct EnvGuard {
        home: Option<std::ffi::OsString>,
        xdg_config_home: Option<std::ffi::OsString>,
        userprofile: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn capture() -> Self {
            Self {
                home: env::var_os("HOME"),
                xdg_config_home: env::var_os("XDG_CONFIG_HOME"),
                userprofile: env::var_os("USERPROFILE"),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            unsafe {
                match self.home.take() {
                    Some(home) => env::set_var("HOME", home),
                    None => env::remove_var("HOME"),
                }
                match self.xdg_config_home.take() {
                    Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
                    None => env::remove_var("XDG_CONFIG_HOME"),
                }
                match self.userprofile.take() {
                    Some(profile) => env::set_var("USERPROFILE", profile),
                    None => env::remove_var("USERPROFILE"),
                }
            }
        }
    }

    fn set_test_environment(dir: &tempfile::TempDir) {
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
            env::remove_var("HOME");
            env::remove_var("USERPROFILE");
        }
    }

    #[test]
    fn test_config_new_writes_defaults() -> Result<()> {
        let _env_lock = lock_env();
        let _guard = EnvGuard::capture();
        let dir = tempdir()?;
        set_test_environment(&dir);

        let config = Config::new()?;
        let expected_filepath = dir.path().join("lector").join("configuration.json");
        assert_eq!(config.filepath(), &expected_filepath);
        assert!(expected_filepath.exists());

        let json_value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&expected_filepath)?)?;
        let navigation: NavigationConfig = serde_json::from_value(json_value["Navigation"].clone())?;
        assert_eq!(navigation, NavigationConfig::default());
        let keymaps: CfgDefaultKeymaps = serde_json::from_value(json_value["Keymap"].clone())?;
        assert_eq!(keymaps, CfgDefaultKeymaps::default());
        Ok(())
    }

    #[test]
    fn test_config_partial_sections() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("partial.json");
        let partial = serde_json::json!({
            "Navigation": { "small_step": 10, "hold_delay_ms": 300 },
            "Keymap": { "quit": "Q" }
        });
        fs::write(&config_path, serde_json::to_string(&partial)?)?;

        let config = Config::load_from(config_path)?;
        assert_eq!(config.navigation.small_step, 10);
        assert_eq!(config.navigation.hold_delay_ms, 300);
        assert_eq!(config.navigation.large_step, 1000);
        assert_eq!(config.navigation.preview_radius, 25);
        assert_eq!(config.keymap_user_dict().quit, "Q");
        assert_eq!(config.keymap_user_dict().help, "?");
        assert_eq!(config.catalog, CatalogConfig::default());
        Ok(())
    }

    #[test]
    fn test_config_invalid_json_falls_back() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("invalid.json");
        fs::write(&config_path, "{ invalid json }")?;

        let config = Config::load_from(config_path)?;
        assert_eq!(config.navigation, NavigationConfig::default());
        assert_eq!(config.catalog, CatalogConfig::default());
        Ok(())
    }

    #[test]
    fn test_config_bad_section_type_is_ignored() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("bad_section.json");
        fs::write(
            &config_path,
            r#"{"Navigation": {"small_step": "lots"}, "Catalog": {"timeout_secs": 3}}"#,
        )?;

        let config = Config::load_from(config_path)?;
        assert_eq!(config.navigation, NavigationConfig::default());
        assert_eq!(config.catalog.timeout_secs, 3);
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("configuration.json");
        let mut config = Config::load_from(path.clone())?;
        config.navigation.preview_radius = 40;
        config.catalog.index_url = "http://localhost/index".to_string();
        config.save()?;

        let loaded = Config::load_from(path)?;
        assert_eq!(loaded.navigation.preview_radius, 40);
        assert_eq!(loaded.catalog.index_url, "http://localhost/index");
        Ok(())
    }

    #[test]
    fn test_get_app_data_prefix() {
        let _env_lock = lock_env();
        let _guard = EnvGuard::capture();

        unsafe {
            let xdg_dir = tempdir().unwrap();
            env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
            env::remove_var("HOME");
            env::remove_var("USERPROFILE");
            assert_eq!(get_app_data_prefix().unwrap(), xdg_dir.path().join("lector"));

            let home_dir = tempdir().unwrap();
            let config_dir = home_dir.path().join(".config").join("lector");
            fs::create_dir_all(&config_dir).unwrap();
            env::set_var("HOME", home_dir.path());
            env::remove_var("XDG_CONFIG_HOME");
            assert_eq!(get_app_data_prefix().unwrap(), config_dir);

            let legacy_home = tempdir().unwrap();
            env::set_var("HOME", legacy_home.path());
            assert_eq!(
                get_app_data_prefix().unwrap(),
                legacy_home.path().join(".lector")
            );

            env::remove_var("HOME");
            env::remove_var("XDG_CONFIG_HOME");
            env::remove_var("USERPROFILE");
            assert!(get_app_data_prefix().is_err());
        }
    }
}
