use std::{env, sync::OnceLock};

use eyre::Result;
use hyper::Uri;

static CONFIG: OnceLock<Config> = OnceLock::new();

const DEFAULT_DATABASE_URL: &str = "sqlite://achievements.db";
const DEFAULT_LANGUAGE: &str = "en";

pub struct Config {
    pub api_url: Uri,
    pub database_url: Box<str>,
    pub language: Box<str>,
}

impl Config {
    pub fn get() -> &'static Self {
        CONFIG.get().expect("CONFIG not yet initialized")
    }
}

pub fn init() -> Result<()> {
    let config = Config {
        api_url: env_var("API_URL")?,
        database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)?,
        language: env_var_or("LANGUAGE", DEFAULT_LANGUAGE)?,
    };

    CONFIG
        .set(config)
        .map_err(|_| eyre!("`Config::init` has already been called"))
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: $arg:ident => $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    Box<str>: s => { Ok(s.into_boxed_str()) },
    Uri: s => { s.parse().map_err(|_| s) },
}

fn env_var<T: EnvKind>(name: &'static str) -> Result<T> {
    let value = env::var(name).map_err(|_| eyre!("missing env variable `{name}`"))?;

    parse_env_var(name, value)
}

fn env_var_or<T: EnvKind>(name: &'static str, default: &str) -> Result<T> {
    let value = env::var(name).unwrap_or_else(|_| {
        warn!("missing env variable `{name}`; defaulting to `{default}`");

        default.to_owned()
    });

    parse_env_var(name, value)
}

fn parse_env_var<T: EnvKind>(name: &'static str, value: String) -> Result<T> {
    T::from_str(value).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uri() {
        let uri: Uri = parse_env_var("API_URL", "https://api.example.com".to_owned()).unwrap();
        assert_eq!(uri.host(), Some("api.example.com"));

        let err = parse_env_var::<Uri>("API_URL", "not a uri".to_owned()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse env variable `API_URL=not a uri`; expected Uri"
        );
    }
}
