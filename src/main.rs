use chatcom::config::{DEFAULT_BASE_URL, DEFAULT_CHAT_PATH, DEFAULT_MAX_LINES, DEFAULT_SIGNIN_PATH};
use chatcom::window::TimeStyle;
use chatcom::{ChatError, ClientConfig};
use clap::Parser;
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatcom", about = "Terminal client for the chatcom room")]
struct Cli {
    #[arg(long, env = "CHATCOM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "CHATCOM_SIGNIN_PATH", default_value = DEFAULT_SIGNIN_PATH)]
    signin_path: String,

    #[arg(long, env = "CHATCOM_CHAT_PATH", default_value = DEFAULT_CHAT_PATH)]
    chat_path: String,

    #[arg(
        long,
        env = "CHATCOM_MAX_LINES",
        default_value_t = DEFAULT_MAX_LINES,
        help = "Lines kept in the chat log, 0 for no limit"
    )]
    max_lines: usize,

    #[arg(
        long,
        env = "CHATCOM_MAX_LINE_CHARS",
        default_value_t = 0,
        help = "Truncate longer lines, 0 to disable"
    )]
    max_line_chars: usize,

    #[arg(
        long,
        env = "CHATCOM_BARE_TIMESTAMPS",
        default_value_t = false,
        help = "Write timestamps as H:M:S without padding"
    )]
    bare_timestamps: bool,

    #[arg(long, env = "CHATCOM_NICK", help = "Nickname to sign in with when asked")]
    nick: Option<String>,
}

impl From<Cli> for ClientConfig {
    fn from(cli: Cli) -> Self {
        Self {
            base_url: cli.base_url,
            signin_path: cli.signin_path,
            chat_path: cli.chat_path,
            max_lines: Some(cli.max_lines),
            max_line_chars: Some(cli.max_line_chars),
            time_style: if cli.bare_timestamps {
                TimeStyle::Bare
            } else {
                TimeStyle::Padded
            },
            nick: cli.nick,
        }
        .normalized()
    }
}

fn main() -> Result<(), ChatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from(Cli::parse());

    // The local offset is only readable while the process has a single thread.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let input = chatcom::client::spawn_stdin_reader();
    let summary = runtime.block_on(chatcom::run(&config, offset, input, std::io::stdout()))?;

    tracing::info!(
        received = summary.received,
        sent = summary.sent,
        dropped = summary.dropped,
        "chatcom exiting"
    );
    Ok(())
}
