//! Configuration of the `fintrack` binary.
//!
//! Values are layered: `config/fintrack.toml` (or `--config PATH`), then
//! `FINTRACK_*` environment variables, then command-line flags.

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/fintrack.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub organization: Option<String>,
    pub timezone: String,
    pub currency: String,
    pub level: String,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000/api".to_string(),
            token: None,
            organization: None,
            timezone: "UTC".to_string(),
            currency: "EUR".to_string(),
            level: "info".to_string(),
            page_size: api_client::MAX_PAGE_SIZE,
        }
    }
}

pub fn load(args: &GlobalArgs) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = layered(config_path, environment())?;
    settings.apply(args);
    Ok(settings)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("FINTRACK").try_parsing(true)
}

/// File values overridden by the environment.
fn layered(config_path: &str, environment: config::Environment) -> Result<Settings> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(environment);
    Ok(builder.build()?.try_deserialize()?)
}

impl Settings {
    fn apply(&mut self, args: &GlobalArgs) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if let Some(organization) = &args.organization {
            self.organization = Some(organization.clone());
        }
        if let Some(timezone) = &args.timezone {
            self.timezone = timezone.clone();
        }
        if let Some(currency) = &args.currency {
            self.currency = currency.clone();
        }
        if let Some(level) = &args.level {
            self.level = level.clone();
        }
        self.organization = self.organization.take().filter(|o| !o.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_and_env() {
        let mut settings = Settings {
            organization: Some("from-env".to_string()),
            ..Settings::default()
        };
        let args = GlobalArgs {
            base_url: Some("https://api.example.com/api".to_string()),
            timezone: Some("Europe/Rome".to_string()),
            ..GlobalArgs::default()
        };

        settings.apply(&args);

        assert_eq!(settings.base_url, "https://api.example.com/api");
        assert_eq!(settings.timezone, "Europe/Rome");
        assert_eq!(settings.organization.as_deref(), Some("from-env"));
        assert_eq!(settings.page_size, 200);
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn environment_overrides_file() {
        let path = std::env::temp_dir().join(format!("fintrack-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "base_url = \"https://file.example.com/api\"\ntimezone = \"Europe/Rome\"\npage_size = 100\ncurrency = \"USD\"\n",
        )
        .unwrap();

        let settings = layered(
            path.to_str().unwrap(),
            env(&[("FINTRACK_PAGE_SIZE", "50"), ("FINTRACK_CURRENCY", "CHF")]),
        );
        std::fs::remove_file(&path).unwrap();
        let settings = settings.unwrap();

        assert_eq!(settings.base_url, "https://file.example.com/api");
        assert_eq!(settings.timezone, "Europe/Rome");
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.currency, "CHF");
        assert_eq!(settings.level, "info");
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let settings = layered("does/not/exist.toml", env(&[])).unwrap();
        assert_eq!(settings.base_url, Settings::default().base_url);
        assert_eq!(settings.page_size, 200);
    }

    #[test]
    fn unparsable_page_size_is_an_error() {
        assert!(layered("does/not/exist.toml", env(&[("FINTRACK_PAGE_SIZE", "lots")])).is_err());
    }

    #[test]
    fn blank_organization_means_none() {
        let mut settings = Settings::default();
        let args = GlobalArgs {
            organization: Some("  ".to_string()),
            ..GlobalArgs::default()
        };
        settings.apply(&args);
        assert!(settings.organization.is_none());
    }
}
