use std::path::PathBuf;

use crate::error::ServerError;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Sample data and other files served under `/static`.
    pub assets_dir: PathBuf,
    /// Output of the frontend build.
    pub dist_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ServerError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Config {
            port,
            assets_dir: PathBuf::from(lookup("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
            dist_dir: PathBuf::from(lookup("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("ASSETS_DIR", "/srv/airmap/assets"),
            ("DIST_DIR", "/srv/airmap/dist"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.assets_dir, PathBuf::from("/srv/airmap/assets"));
        assert_eq!(config.dist_dir, PathBuf::from("/srv/airmap/dist"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ServerError::InvalidPort(p) if p == "eighty"));
    }
}
