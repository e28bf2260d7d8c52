// Configuration definitions, functions and tests
//

use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string as de_num;
use std::sync::Arc;
use std::time::Duration;

static ENV_PREFIX: &str = "DL";

fn prefixed_env(suffix: &str) -> String {
    format!("{}__{}", ENV_PREFIX, suffix)
}

#[derive(Clone, derived_deref::Deref)]
pub struct Conf {
    #[target]
    pub env_conf: Arc<EnvConf>,
    pub env: Env,
}

impl Conf {
    pub fn new(env: Env, env_conf: EnvConf) -> Self {
        Self {
            env_conf: Arc::new(env_conf),
            env,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct EnvConf {
    pub backend: Backend,
    pub mock: MockConf,
    pub hosted: Option<HostedConf>,
    pub log: Log,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Mock,
    Hosted,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MockConf {
    #[serde(deserialize_with = "de_num")]
    pub latency_ms: u64,
}

impl MockConf {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct HostedConf {
    pub base_url: String,
    pub api_key: SecretString,
    #[serde(deserialize_with = "de_num")]
    pub timeout_ms: u64,
}

impl HostedConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub pretty: bool,
}

impl EnvConf {
    pub fn derive(env: Env) -> Self {
        let conf_dir = match std::env::var(prefixed_env("CONF_DIR")) {
            Ok(dir) => std::path::PathBuf::from(dir),
            Err(_) => std::env::current_dir().unwrap().join("conf"),
        };

        let conf_builder = config::Config::builder()
            .add_source(config::File::from(conf_dir.join("default")).required(true))
            .add_source(config::File::from(conf_dir.join(env.to_string())).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build();

        let conf = conf_builder.unwrap();

        match conf.try_deserialize() {
            Ok(conf) => conf,
            Err(e) => {
                dbg!(&e);
                Err(e).expect("correct config")
            }
        }
    }

    pub fn test_default() -> Self {
        Self {
            backend: Backend::Mock,
            mock: MockConf { latency_ms: 0 },
            hosted: None,
            log: Log { pretty: false },
        }
    }
}

use derive_more::Display;

#[derive(Debug, PartialEq, Display, Clone, Copy)]
pub enum Env {
    #[display(fmt = "local")]
    Local,
    #[display(fmt = "prod")]
    Prod,
}

impl Env {
    pub fn derive() -> Self {
        // One variable to rule all
        let glob_env = std::env::var("SITE_ENV").unwrap_or_else(|_| "local".into());

        // DL__ENV overrides it for this crate alone
        std::env::var(prefixed_env("ENV"))
            .unwrap_or(glob_env)
            .try_into()
            .expect("valid variable")
    }

    pub fn local(&self) -> bool {
        matches!(self, Self::Local)
    }

    pub fn prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl TryFrom<String> for Env {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "Unknown environment `{other}`. Use either `local` or `prod`."
            )),
        }
    }
}
