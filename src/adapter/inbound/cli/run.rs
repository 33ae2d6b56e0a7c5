//! Handler for the default `shell` command.

use std::io::IsTerminal;
use std::path::Path;

use tokio::io::BufReader;

use super::handler::Handler;
use super::{output, shell};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Load configuration, log in and run the shell on stdin.
pub async fn execute(config_path: Option<&Path>, verbose: u8) -> Result<()> {
    let config = Config::resolve(config_path)?;
    config.logging.with_verbosity(verbose).init();

    let session = bootstrap::start_session(&config).await?;
    print_startup(&config, &session.me().name);

    let handler = Handler::new(session, config.session.clone());
    let interactive = std::io::stdin().is_terminal() && !output::is_json();

    shell::run(&handler, BufReader::new(tokio::io::stdin()), interactive).await
}

fn print_startup(config: &Config, user: &str) {
    if output::is_quiet() && !output::is_json() {
        return;
    }
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("User", format!("u/{user}"));
    output::field("API", &config.reddit.api_url);
    output::field("Page size", config.session.page_size);
    output::hint("type `help` for commands, `exit` to leave");
}
