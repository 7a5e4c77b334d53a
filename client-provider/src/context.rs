use std::{fmt, str::FromStr};
use thiserror::Error;

/// Where a provider is running.
///
/// A `Browser` context lives for as long as the page does, so the provider keeps a single client
/// around and hands it out to every caller. A `Server` context is one-shot: every rendered
/// request gets its own client and nothing is retained between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    Server,
    Browser
}

impl ExecutionContext {
    /// Detect the context from the compilation target.
    ///
    /// On `wasm32` this checks for a global `window`, so WASM running in a worker or under a
    /// server-side JS runtime is still treated as `Server`. Native targets are always `Server`.
    pub fn detect() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if web_sys::window().is_some() {
                return ExecutionContext::Browser;
            }
        }

        ExecutionContext::Server
    }

    pub fn is_browser(self) -> bool {
        self == ExecutionContext::Browser
    }

    pub fn is_server(self) -> bool {
        self == ExecutionContext::Server
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Server => write!(f, "server"),
            ExecutionContext::Browser => write!(f, "browser")
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown execution context `{0}`, expected `server` or `browser`")]
pub struct ParseContextError(String);

impl FromStr for ExecutionContext {
    type Err = ParseContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" | "ssr" => Ok(ExecutionContext::Server),
            "browser" | "client" => Ok(ExecutionContext::Browser),
            _ => Err(ParseContextError(s.to_string()))
        }
    }
}
