use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::Result;

pub static CONFIG_FILE: &'static str = "imgstash.toml";

/// Prefix for environment variables mapped onto the config, e.g.
/// `IMGSTASH__STORAGE__DIR=/srv/images`.
pub static ENV_PREFIX: &'static str = "IMGSTASH";

/// Bare environment variable overriding the listen port. Takes precedence
/// over every other source.
pub static PORT_VAR: &'static str = "PORT";

/// Service configuration. All values are fixed at process start.
///
/// # Sensible defaults
///
/// `Config::default()` listens on `0.0.0.0:3001` and keeps its data below
/// `/var/data`. Use the *struct update syntax* to change just a few values:
///
/// ```ignore
/// let cfg = Config {
///     port: 8080,
///     storage: Storage {
///         dir: "./data".into(),
///     },
///     ..Default::default()
/// }
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub name: String,
    pub version: String,

    /// Address on which to bind the listener.
    pub host: IpAddr,
    pub port: u16,

    pub storage: Storage,
    pub fetch: Fetch,
    pub tracing: Tracing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            storage: Storage::default(),
            fetch: Fetch::default(),
            tracing: Tracing::default(),
        }
    }
}

impl Config {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Loads config from the default file location. The file itself is
/// optional, environment variables still apply without it.
pub fn load<T: DeserializeOwned>() -> Result<T> {
    build(CONFIG_FILE, false)
}

/// Loads config from toml file at path using provided name. The file must
/// exist.
///
/// For example for `name` == `imgstash.toml` we will load both
/// `imgstash.toml` and `secret.imgstash.toml`.
pub fn load_from<T: DeserializeOwned>(name: impl AsRef<str>) -> Result<T> {
    build(name.as_ref(), true)
}

/// Loads config from multiple toml files at given paths, later files
/// overriding earlier ones.
pub fn load_from_many<T: DeserializeOwned>(paths: &[impl AsRef<str>]) -> Result<T> {
    let mut builder = config::Config::builder();
    for path in paths {
        builder = builder.add_source(config::File::with_name(path.as_ref()));
    }
    let config = builder
        .add_source(environment())
        .set_override_option("port", std::env::var(PORT_VAR).ok())?
        .build()?;

    let config: T = config.try_deserialize()?;

    Ok(config)
}

fn build<T: DeserializeOwned>(name: &str, required: bool) -> Result<T> {
    let config = config::Config::builder()
        .add_source(config::File::with_name(name).required(required))
        .add_source(config::File::with_name(&format!("secret.{}", name)).required(false))
        .add_source(environment())
        .set_override_option("port", std::env::var(PORT_VAR).ok())?
        .build()?;

    let config: T = config.try_deserialize()?;

    Ok(config)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .prefix_separator("__")
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Storage {
    /// Base directory holding the `images` directory and the `images.json`
    /// catalog.
    pub dir: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/var/data"),
        }
    }
}

impl Storage {
    pub fn images_dir(&self) -> PathBuf {
        self.dir.join("images")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join("images.json")
    }
}

/// Outbound download settings. Nothing times out unless configured.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Fetch {
    pub user_agent: String,
    /// Limit on the whole download, in seconds.
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Fetch {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Tracing {
    pub enabled: bool,

    pub mode: crate::tracing::Mode,
    pub level: crate::tracing::Level,

    pub loki_address: String,
}

impl Default for Tracing {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: crate::tracing::Mode::default(),
            level: crate::tracing::Level::default(),
            loki_address: "".to_string(),
        }
    }
}
