use clap::Parser;
use copilot_relay::relay_state::{RelayConfig, RelayState};
use copilot_relay::request_log::LogMode;
use copilot_relay::server;

#[derive(Parser, Debug)]
#[command(name = "copilot-relay")]
#[command(about = "Streaming relay between a Copilot chat surface and its completion API")]
struct CliArgs {
    /// Host address to bind the relay server
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the relay server
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Console presentation mode for inbound requests
    #[arg(long, env = "LOG_MODE", value_enum, default_value = "compact")]
    log_mode: LogMode,

    /// Base URL of the identity API
    #[arg(long, env = "IDENTITY_URL", default_value = "https://api.github.com")]
    identity_url: String,

    /// Base URL of the streaming completion API
    #[arg(long, env = "COMPLETION_URL", default_value = "https://api.githubcopilot.com")]
    completion_url: String,

    /// Overall timeout in seconds for outbound API calls
    #[arg(long, default_value_t = 600)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = RelayConfig {
        host: args.host,
        port: args.port,
        log_mode: args.log_mode,
        identity_base: args.identity_url,
        completion_base: args.completion_url,
        timeout: args.timeout,
    };
    let state = RelayState::new(&config)?;

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = server::startup(config, state) => res,
            _ = tokio::signal::ctrl_c() => {
                println!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })?;

    Ok(())
}
