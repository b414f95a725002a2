//! Settings from the command line on native and from GET parameters on web.
//!
//! On web, `?clizoom=15&clireset` becomes `--zoom 15 --reset` and
//! `?envLOG_LEVEL=debug` becomes an environment-like variable readable with
//! [`get_env`].

use clap::Parser;
use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static ENV_MAP: std::cell::RefCell<HashMap<String, String>> = std::cell::RefCell::new(HashMap::new());
}

const PROGRAM_NAME: &str = "workout-map";

/// Arguments and variables extracted from a URL query string
#[derive(Debug, Default, PartialEq)]
pub struct QueryParams {
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

/// Split `key=value&flag` pairs into CLI arguments (`cli` prefix) and
/// environment variables (`env` prefix). Other keys are ignored.
pub fn parse_query(query: &str) -> QueryParams {
    let mut params = QueryParams {
        args: vec![PROGRAM_NAME.to_string()],
        env: HashMap::new(),
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let Some(arg_key) = key.strip_prefix("cli") {
            if !arg_key.is_empty() {
                params.args.push(format!("--{}", arg_key));
            }
            if !value.is_empty() {
                params.args.push(value.to_string());
            }
        } else if let Some(env_key) = key.strip_prefix("env")
            && !env_key.is_empty()
        {
            params.env.insert(env_key.to_string(), value.to_string());
        }
    }
    params
}

#[cfg(target_arch = "wasm32")]
fn location_query() -> QueryParams {
    let location_string = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let query = location_string
        .split_once('?')
        .map(|(_, q)| q.split('#').next().unwrap_or_default())
        .unwrap_or_default();
    parse_query(query)
}

/// Generic function to get environment variable, parsing it to the desired type.
pub fn get_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    #[cfg(target_arch = "wasm32")]
    {
        ENV_MAP.with(|map| map.borrow().get(key).and_then(|s| s.parse().ok()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var(key).ok().and_then(|s| s.parse().ok())
    }
}

/// Parses environment variables from GET parameters on web.
/// On native, environment variables are already set.
pub fn parse_env() {
    #[cfg(target_arch = "wasm32")]
    {
        let params = location_query();
        ENV_MAP.with(|map| map.borrow_mut().extend(params.env));
    }
}

/// Parses from the command line arguments on native and from GET parameters on web.
pub fn parse_args<T: Parser>() -> Result<T, clap::Error> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        T::try_parse()
    }
    #[cfg(target_arch = "wasm32")]
    {
        let params = location_query();
        ENV_MAP.with(|map| map.borrow_mut().extend(params.env));
        T::try_parse_from(params.args)
    }
}
