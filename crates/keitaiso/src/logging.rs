//! tracing initialization

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` overrides `level` when set. Returns `false` if a global subscriber
/// was already installed (e.g. by the host application).
pub fn init_tracing(level: LogLevel) -> bool {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(true)
    .with_level(true)
    .try_init()
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn second_initialization_is_reported() {
    // The first call may lose against another test that installed a subscriber,
    // but after it a subscriber is always installed.
    let _ = init_tracing(LogLevel::Debug);
    assert!(!init_tracing(LogLevel::Info));
  }
}
