#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use tasklist::{
    client::{render, resolve_reference, SyncSession, TaskClient, DEFAULT_API_URL},
    config::Config,
    serve,
};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "In-memory to-do list service and its terminal client")]
struct Cli {
    /// Base URL of the task service
    #[arg(long, global = true, env = "TASKLIST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the task service
    Serve,
    /// Show all tasks
    List,
    /// Create a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a task's completion (`#N` or id)
    Toggle { task: String },
    /// Delete a task (`#N` or id)
    Remove { task: String },
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => run_serve().await,
        command => {
            init_client_tracing();
            let client = TaskClient::new(&cli.api_url)
                .with_context(|| format!("failed to create client for {}", cli.api_url))?;
            run_client(SyncSession::new(client), command).await
        }
    }
}

async fn run_serve() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tasklist=debug")),
        )
        .with_current_span(true)
        .init();

    let config = Config::from_env().context("failed to load task service config")?;
    serve(config).await
}

fn init_client_tracing() {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

async fn run_client(mut session: SyncSession, command: Command) -> Result<()> {
    session.load().await;

    match command {
        Command::Serve | Command::List => {}
        Command::Add { text } => {
            session.add(&text.join(" ")).await;
        }
        Command::Toggle { task } => toggle(&mut session, &task).await,
        Command::Remove { task } => remove(&mut session, &task).await,
        Command::Shell => return run_shell(session).await,
    }

    print_view(&session);
    Ok(())
}

async fn toggle(session: &mut SyncSession, reference: &str) {
    match resolve_reference(session.view(), reference) {
        Some(id) => {
            session.toggle(&id).await;
        }
        None => eprintln!("no task matches {reference}"),
    }
}

async fn remove(session: &mut SyncSession, reference: &str) {
    match resolve_reference(session.view(), reference) {
        Some(id) => {
            session.remove(&id).await;
        }
        None => eprintln!("no task matches {reference}"),
    }
}

async fn run_shell(mut session: SyncSession) -> Result<()> {
    println!("commands: add <text> | toggle <#N|id> | rm <#N|id> | list | quit");
    print_view(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "" => continue,
            "add" => {
                session.add(rest).await;
            }
            "toggle" | "t" => toggle(&mut session, rest).await,
            "rm" | "remove" | "delete" => remove(&mut session, rest).await,
            "list" | "ls" => session.load().await,
            "quit" | "exit" | "q" => break,
            other => {
                eprintln!("unknown command: {other}");
                continue;
            }
        }
        print_view(&session);
    }
    Ok(())
}

fn print_view(session: &SyncSession) {
    for line in render(session.view(), Instant::now()) {
        println!("{line}");
    }
}
