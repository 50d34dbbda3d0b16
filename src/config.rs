use core::time::Duration;

macro_rules! env_or_default {
    ($name:expr, $default:expr) => {
        if let Some(s) = option_env!($name) {
            s
        } else {
            $default
        }
    };
}

pub const LOG_FILE: &str = env_or_default!("TWATCH_LOG_FILE", "search_log.txt");

pub const SOURCES: [&str; 2] = [
    "https://torrentz.eu/search?f=",
    "https://torrentz.eu/searchA?f=",
];

pub const TERMS: [&str; 2] = ["ubuntu", "elementary os"];

/// Result rows on the aggregator are `<dl><dt>title » meta</dt>...</dl>`.
pub const SELECTOR: &str = "dl > dt";

pub const LIMIT: usize = 10;
pub const TIMEOUT: Duration = Duration::from_secs(30);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DELAY: Duration = Duration::from_millis(250);
