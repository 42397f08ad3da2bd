//! INI file configuration adapter.

use crate::domain::config_validation::parse_bool;
use crate::domain::error::StochtraderError;
use crate::domain::num::Num;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StochtraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| StochtraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StochtraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| StochtraderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        self.config
            .getuint(section, key)
            .ok()
            .flatten()
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    fn get_num(&self, section: &str, key: &str, default: Num) -> Num {
        self.config
            .get(section, key)
            .and_then(|v| v.trim().parse::<Num>().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
path = data/asml.csv
name = ASML

[strategy]
name = Stochastic D/D2
unstable_period = 50
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("data/asml.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "name"),
            Some("Stochastic D/D2".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\npath = x.csv\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_usize_returns_value() {
        let adapter = FileConfigAdapter::from_string("[stochastic]\nlookback = 28\n").unwrap();
        assert_eq!(adapter.get_usize("stochastic", "lookback", 14), 28);
    }

    #[test]
    fn get_usize_returns_default_for_missing_or_invalid() {
        let adapter =
            FileConfigAdapter::from_string("[stochastic]\nd_smoothing = abc\n").unwrap();
        assert_eq!(adapter.get_usize("stochastic", "lookback", 14), 14);
        assert_eq!(adapter.get_usize("stochastic", "d_smoothing", 3), 3);
    }

    #[test]
    fn get_num_returns_exact_decimal() {
        let adapter = FileConfigAdapter::from_string("[backtest]\namount = 2.5\n").unwrap();
        assert_eq!(
            adapter.get_num("backtest", "amount", Num::ONE),
            Num::from(5) / Num::from(2)
        );
    }

    #[test]
    fn get_num_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[backtest]\namount = lots\n").unwrap();
        assert_eq!(adapter.get_num("backtest", "amount", Num::ONE), Num::ONE);
    }

    #[test]
    fn get_bool_values() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\na = true\nb = no\nc = 1\n").unwrap();
        assert!(adapter.get_bool("backtest", "a", false));
        assert!(!adapter.get_bool("backtest", "b", true));
        assert!(adapter.get_bool("backtest", "c", false));
        assert!(adapter.get_bool("backtest", "missing", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\nindicators = out/so.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "indicators"),
            Some("out/so.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(StochtraderError::ConfigParse { .. })));
    }
}
