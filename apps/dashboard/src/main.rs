mod config;
mod render;

use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DashboardController, DashboardEvent, LoadingFeedback, NotificationLevel, RandomUserClient,
    SortCoordinator, UserSource, WorkingSetStore,
};
use shared::domain::{SortOption, UserId};
use storage::LocalStore;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Browse randomly generated user profiles")]
struct Cli {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    batch_size: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the saved profiles (or fetch a first batch) and print them.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    LoadMore,
    Generate,
    Sort {
        option: SortOption,
    },
    ResetSort,
    Show {
        id: String,
    },
    /// Remove the saved profiles, or every saved value with `--all`.
    Clear {
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(batch_size) = cli.batch_size.filter(|size| *size > 0) {
        settings.batch_size = batch_size;
    }

    let database_url = normalize_database_url(&settings.database_url);
    let store = LocalStore::open(&database_url)
        .await
        .with_context(|| format!("failed to open local store at {database_url}"))?;
    info!(%database_url, api_url = %settings.api_url, "dashboard starting");

    if let Command::Clear { all } = cli.command {
        if all {
            store.clear_all().await;
            println!("cleared all saved data");
        } else {
            WorkingSetStore::new(store).clear().await;
            println!("cleared saved profiles");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let source: Arc<dyn UserSource> = Arc::new(
        RandomUserClient::new(&settings.api_url)
            .with_context(|| format!("invalid api url {}", settings.api_url))?,
    );
    let sorting = Arc::new(SortCoordinator::load(store.clone()).await);
    let loading = Arc::new(LoadingFeedback::with_min_display(Duration::from_millis(
        settings.min_loading_ms,
    )));
    let controller = DashboardController::new(
        source,
        WorkingSetStore::new(store),
        sorting,
        loading,
        settings.batch_size,
    );

    let mut events = controller.subscribe_events();
    let status_line = spawn_status_line(&controller);

    controller.start().await;
    let mut ok = drain_notifications(&mut events);

    match cli.command {
        Command::List { search } => {
            if let Some(term) = search {
                controller.search(term);
            }
            print_cards(&controller);
        }
        Command::LoadMore => {
            ok &= controller.load_more().await.is_ok();
            ok &= drain_notifications(&mut events);
            print_cards(&controller);
        }
        Command::Generate => {
            let mut busy = controller.loading().subscribe();
            busy.wait_for(|busy| !*busy)
                .await
                .context("loading state closed")?;

            match controller.generate_one().await {
                Ok(Some(user)) => print!("{}", render::render_details(&user)),
                Ok(None) => eprintln!("busy, try again shortly"),
                Err(err) => {
                    error!(error = %err, "profile generation failed");
                    ok = false;
                }
            }
            ok &= drain_notifications(&mut events);
        }
        Command::Sort { option } => {
            controller.change_sort(option).await;
            print_cards(&controller);
        }
        Command::ResetSort => {
            controller.change_sort(SortOption::None).await;
            print_cards(&controller);
        }
        Command::Show { id } => match controller.select_user(&UserId::from(id.as_str())) {
            Some(user) => {
                print!("{}", render::render_details(&user));
                controller.close_user_details();
            }
            None => {
                eprintln!("no saved profile with id {id}");
                ok = false;
            }
        },
        Command::Clear { .. } => {}
    }

    status_line.abort();
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn spawn_status_line(controller: &Arc<DashboardController>) -> tokio::task::JoinHandle<()> {
    let mut busy = controller.loading().stream();
    let controller = Arc::downgrade(controller);
    tokio::spawn(async move {
        while let Some(busy) = busy.next().await {
            let Some(controller) = controller.upgrade() else {
                break;
            };
            if busy {
                eprintln!("{}", controller.loading_message());
            }
        }
    })
}

fn print_cards(controller: &DashboardController) {
    let view = controller.view();
    print!(
        "{}",
        render::render_cards(
            &view,
            controller.users().len(),
            controller.sort_option(),
            &controller.search_term(),
        )
    );
    println!(
        "page {} ({} per page)",
        controller.page(),
        controller.users_per_page()
    );
}

/// Prints pending notifications; false if any of them reported a failure.
fn drain_notifications(events: &mut broadcast::Receiver<DashboardEvent>) -> bool {
    let mut ok = true;
    loop {
        match events.try_recv() {
            Ok(DashboardEvent::Notification(notification)) => {
                eprintln!("[{}] {}", notification.title, notification.message);
                if notification.level == NotificationLevel::Error {
                    ok = false;
                }
            }
            Ok(DashboardEvent::ViewChanged { .. }) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    ok
}
