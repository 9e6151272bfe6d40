use anyhow::Result;
use clap::Parser;
use client_core::{controller_from_settings, load_settings, ControllerEvent, PaginationController};
use shared::domain::RecordId;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the provider base url from client.toml / environment.
    #[arg(long)]
    base_url: Option<String>,
    /// Follow this many `next` links after the first page.
    #[arg(long, default_value_t = 0)]
    pages: u32,
    /// Read navigation commands from stdin.
    #[arg(long)]
    interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    First,
    Retry,
    Show(RecordId),
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim().to_ascii_lowercase();
    let mut words = input.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("n" | "next", None) => Command::Next,
        ("p" | "prev" | "previous", None) => Command::Previous,
        ("f" | "first" | "refresh", None) => Command::First,
        ("r" | "retry", None) => Command::Retry,
        ("q" | "quit" | "exit", None) => Command::Quit,
        ("d" | "show", Some(id)) => Command::Show(RecordId(id.parse().ok()?)),
        _ => return None,
    };
    words.next().is_none().then_some(command)
}

async fn print_state(controller: &PaginationController) {
    print!("{}", render::render_snapshot(&controller.snapshot().await));
}

async fn run_interactive(controller: &PaginationController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("commands: n(ext) p(revious) f(irst) r(etry) d <id> q(uit)");

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            println!("unknown command '{}'", line.trim());
            continue;
        };
        match command {
            Command::Next => controller.load_next().await,
            Command::Previous => controller.load_previous().await,
            Command::First => controller.load_first().await,
            Command::Retry => controller.retry().await,
            Command::Show(id) => {
                let snapshot = controller.snapshot().await;
                match snapshot.records.iter().find(|record| record.id() == id) {
                    Some(record) => print!("{}", render::render_detail(record)),
                    None => println!("no character #{} on this page", id.0),
                }
                continue;
            }
            Command::Quit => break,
        }
        print_state(controller).await;
    }

    Ok(())
}

/// Drains controller events until the controller goes away, logging failed
/// loads. Returns how many failures were logged.
async fn log_load_failures(mut events: broadcast::Receiver<ControllerEvent>) -> usize {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(ControllerEvent::LoadFailed { kind, error }) => {
                tracing::debug!(kind = kind.as_str(), "load failed: {error:?}");
                logged += 1;
            }
            Ok(ControllerEvent::StateChanged(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event listener lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
    logged
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let controller = controller_from_settings(&settings)?;

    tokio::spawn(log_load_failures(controller.subscribe_events()));

    controller.load_first().await;
    print_state(&controller).await;

    for _ in 0..args.pages {
        if !controller.snapshot().await.has_next() {
            break;
        }
        controller.load_next().await;
        print_state(&controller).await;
    }

    if args.interactive {
        run_interactive(&controller).await?;
    }

    Ok(())
}
