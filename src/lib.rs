pub mod bus;
pub mod cassette_reader;
pub mod cassette_writer;
pub mod config;
pub mod disk;
pub mod error;
pub mod keyboard;
pub mod machine;
pub mod terminal;
pub mod utils;

pub use bus::{Bus, PortIo};
pub use config::{CassetteConfig, Config, SaveFormat};
pub use disk::{DiskController, DiskProxy, NoDisk};
pub use error::{Direction, Fault, IoError};
pub use keyboard::{BufferedKeyboard, ChannelKeyboard, Keyboard};
pub use machine::{Cpu, Machine};
pub use utils::{hexdump, partial_hexdump};

use std::io::{self, Stdout};

use tracing_subscriber::{fmt, EnvFilter};

/// Bus wired to the process console: stdin keyboard and stdout terminal.
pub fn console_bus<D: DiskController>(config: &Config, disk: D) -> Bus<ChannelKeyboard, Stdout, D> {
    Bus::new(config, ChannelKeyboard::stdin(), io::stdout(), disk)
}

/// Installs a `RUST_LOG` driven subscriber. Logs go to stderr since stdout
/// carries the terminal.
pub fn init_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
        tracing::info!("logging initialized");
    }
}
