//! Configuration path resolution and loading

use super::{Config, DEFAULT_CONFIG_FILE};
use crate::core::diagnostics::Diagnostics;
use crate::core::error::Result;
use std::path::{Path, PathBuf};

/// Command line flag selecting the configuration file.
pub const CONFIG_FLAG: &str = "logger-config";

/// What to do when the configuration file cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Report the failure and continue with [`Config::default_config`]
    #[default]
    Lenient,
    /// Return the failure to the caller
    Strict,
}

/// Scan process arguments for `-logger-config <path>` or `-logger-config=<path>`.
///
/// `args` must not include the program name. The scan stops at the first
/// occurrence of the flag; a trailing flag without a value keeps the default.
/// The `--logger-config` spelling is accepted as well.
///
/// ```
/// use logvin::config::resolve_config_path;
/// use std::path::PathBuf;
///
/// let path = resolve_config_path(["-v", "-logger-config=/etc/app/logger.yaml"]);
/// assert_eq!(path, PathBuf::from("/etc/app/logger.yaml"));
///
/// let path = resolve_config_path(Vec::<String>::new());
/// assert_eq!(path, PathBuf::from("./config/logger.yaml"));
/// ```
pub fn resolve_config_path<I, S>(args: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            continue;
        };
        if flag == CONFIG_FLAG {
            return match args.next() {
                Some(value) => PathBuf::from(value.as_ref()),
                None => PathBuf::from(DEFAULT_CONFIG_FILE),
            };
        }
        if let Some(value) = flag
            .strip_prefix(CONFIG_FLAG)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return PathBuf::from(value);
        }
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Read the configuration at `path`.
///
/// In [`LoadMode::Lenient`] this never fails: read and parse errors are
/// reported to `diagnostics` and the built-in default is returned instead.
pub fn load(path: &Path, mode: LoadMode, diagnostics: &Diagnostics) -> Result<Config> {
    diagnostics.report(format!("logger config file: {}", path.display()));
    match Config::load(path) {
        Ok(config) => {
            diagnostics.report(format!("load {} success. {}", path.display(), config));
            Ok(config)
        }
        Err(e) if mode == LoadMode::Strict => Err(e),
        Err(e) => {
            diagnostics.report(format!("{}; using default config", e));
            Ok(Config::default_config())
        }
    }
}
