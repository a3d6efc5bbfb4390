//! Interactive shell: one query per line, one request in flight at a time.

use crate::api::{ApiClient, ApiError, PriceApi};
use crate::config::Config;
use crate::format::Formatter;
use crate::reconcile::reconcile;
use crate::session::{QuerySession, QueryState, Ticket};
use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// What each submitted line searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellMode {
    #[default]
    Product,
    Brand,
}

/// Reads queries from stdin and prints results as they arrive.
pub struct ShellCommand {
    config: Config,
    mode: ShellMode,
}

type InFlight<F> = Option<(Ticket, String, Pin<Box<F>>)>;

impl ShellCommand {
    /// Creates a new shell command.
    pub fn new(config: Config, mode: ShellMode) -> Self {
        Self { config, mode }
    }

    /// Runs the shell on stdin/stdout until EOF or `:q`.
    pub async fn execute(&self) -> Result<()> {
        let client = ApiClient::new(&self.config).context("Failed to create HTTP client")?;
        let input = BufReader::new(tokio::io::stdin());
        let mut output = std::io::stdout();

        self.run(&client, input, &mut output).await
    }

    /// Runs the shell over arbitrary input and output (for testing).
    pub async fn run<C, R, W>(&self, client: &C, input: R, output: &mut W) -> Result<()>
    where
        C: PriceApi,
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let formatter = Formatter::new(self.config.format);

        match self.mode {
            ShellMode::Product => {
                writeln!(output, "Type a product name and press Enter (:q to quit)")?;
                let mut session = QuerySession::new();
                drive(
                    &mut session,
                    input,
                    output,
                    |q| async move { client.scrape_all(&q).await },
                    |query, set| formatter.format_comparison(query, &reconcile(set)),
                )
                .await
            }
            ShellMode::Brand => {
                writeln!(output, "Type a brand name and press Enter (:q to quit)")?;
                let mut session = QuerySession::new();
                drive(
                    &mut session,
                    input,
                    output,
                    |q| async move { client.search_brand(&q).await },
                    |_, brand| formatter.format_brand(brand),
                )
                .await
            }
        }
    }
}

/// Multiplexes input lines with the in-flight request.
///
/// Lines that arrive while a request is outstanding are ignored.
async fn drive<T, R, W, F, Fut, V>(
    session: &mut QuerySession<T>,
    input: R,
    output: &mut W,
    fetch: F,
    render: V,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    V: Fn(&str, &T) -> String,
{
    let mut lines = input.lines();
    let mut in_flight: InFlight<Fut> = None;
    let mut closed = false;

    prompt(output)?;

    while !closed || in_flight.is_some() {
        tokio::select! {
            line = lines.next_line(), if !closed => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("Input closed");
                    closed = true;
                    continue;
                };

                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if matches!(query, ":q" | ":quit" | "exit") {
                    closed = true;
                    continue;
                }

                match session.begin(query) {
                    Some(ticket) => {
                        writeln!(output, "Searching for \"{}\"...", query)?;
                        in_flight = Some((ticket, query.to_string(), Box::pin(fetch(query.to_string()))));
                    }
                    None => {
                        let current = match session.state() {
                            QueryState::Loading { query } => query.as_str(),
                            _ => "",
                        };
                        writeln!(output, "Still searching for \"{}\"; ignoring \"{}\"", current, query)?;
                    }
                }
            }
            outcome = next_outcome(&mut in_flight), if in_flight.is_some() => {
                let Some((ticket, query, _)) = in_flight.take() else {
                    continue;
                };

                if session.settle(ticket, outcome) {
                    match session.state() {
                        QueryState::Success(payload) => writeln!(output, "{}", render(&query, payload))?,
                        QueryState::Error(message) => writeln!(output, "Error: {}", message)?,
                        _ => {}
                    }
                }

                if !closed {
                    prompt(output)?;
                }
            }
        }
    }

    Ok(())
}

/// Awaits the in-flight request; pends forever if there is none.
async fn next_outcome<F: Future>(slot: &mut InFlight<F>) -> F::Output {
    match slot {
        Some((_, _, request)) => request.as_mut().await,
        None => std::future::pending().await,
    }
}

fn prompt(output: &mut impl Write) -> Result<()> {
    write!(output, "> ")?;
    output.flush()?;
    Ok(())
}
