use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Datelike;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use prayer_countdown::{
    app::{Application, Services},
    appsettings::AppSettings,
    countdown::{Clock, EngineContext, SystemClock},
    fetcher::{AlQuranClient, AladhanClient, NominatimGeocoder},
    i18n::{self, Language},
    notify::build_notifier,
    presentation::TerminalPresenter,
    storage::{FileLocationStore, InMemoryLocationStore, LocationStore},
    usage::UsageLogger,
};

#[derive(Parser)]
#[command(author, version, about = "Live countdown to the next prayer time")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Latitude in degrees, used together with --lon.
    #[arg(long, global = true, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in degrees, used together with --lat.
    #[arg(long, global = true, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Place name to look up, or a label for --lat/--lon.
    #[arg(long, global = true)]
    name: Option<String>,

    /// Interface language (tr, en, de, ar, es, fr, ru, pt, hi, zh).
    #[arg(long, global = true)]
    lang: Option<String>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Show the live countdown (default).
    Run,
    /// Print the fasting-month calendar of a year.
    Calendar {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Save a location given by --lat/--lon or --name, then exit.
    Locate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();

    let args = Args::parse();
    let settings = AppSettings::load().context("Failed to load settings")?;

    let language_code = args
        .lang
        .clone()
        .or_else(|| settings.language.code.clone())
        .unwrap_or_else(|| i18n::detect_from_env().to_owned());
    let language = Language::load(settings.language.dir.as_deref(), &language_code).await;
    log::info!("[START] Language {}", language.code());

    let clock = build_clock(settings.timezone.as_deref())?;
    let store = build_store(settings.storage.path.clone());

    let services = Services {
        fetcher: Arc::new(AladhanClient::new(&settings.api)?),
        geocoder: Arc::new(NominatimGeocoder::new(&settings.geocoding)?),
        ayah: Arc::new(AlQuranClient::new(&settings.ayah, language.code())?),
        store,
        usage: UsageLogger::new(settings.usage.endpoint.clone(), language.code())?,
    };
    let context = EngineContext {
        presenter: Arc::new(TerminalPresenter::new()),
        notifier: build_notifier(&settings.notifications),
        catalog: Arc::new(language),
        clock: Arc::clone(&clock),
        notifications_enabled: settings.notifications.enabled,
    };
    let mut app = Application::new(
        services,
        context,
        Duration::from_secs(settings.refresh.interval_secs.max(60)),
    );

    let command = args.command.unwrap_or(Command::Run);
    let located = choose_location(&mut app, &args).await;

    match command {
        Command::Run => {
            if let Err(e) = located {
                log::error!("Initial schedule not loaded, retrying on next refresh: {:#}", e);
            }
            app.run(shutdown_signal()).await;
        }
        Command::Calendar { year } => {
            located?;
            let year = year.unwrap_or_else(|| clock.now().year());
            app.ramadan_calendar(year).await?;
        }
        Command::Locate => {
            located?;
            if app.coordinates().is_none() {
                anyhow::bail!("Give --lat and --lon, or --name");
            }
        }
    }

    Ok(())
}

async fn choose_location(app: &mut Application, args: &Args) -> anyhow::Result<()> {
    match (args.lat, args.lon, &args.name) {
        (Some(lat), Some(lon), name) => app.set_coordinates(lat, lon, name.clone()).await,
        (Some(_), None, _) | (None, Some(_), _) => {
            anyhow::bail!("--lat and --lon must be given together")
        }
        (None, None, Some(name)) => app.locate_by_name(name).await,
        (None, None, None) => app.restore_location().await.map(|_| ()),
    }
}

fn build_clock(timezone: Option<&str>) -> anyhow::Result<Arc<dyn Clock>> {
    let timezone = timezone
        .map(|name| {
            name.parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Unknown timezone {}: {}", name, e))
        })
        .transpose()?;

    Ok(Arc::new(SystemClock::new(timezone)))
}

fn build_store(path: Option<PathBuf>) -> Arc<dyn LocationStore> {
    match path.or_else(FileLocationStore::default_path) {
        Some(path) => Arc::new(FileLocationStore::new(path)),
        None => {
            log::warn!("No data directory available, location will not be remembered");
            Arc::new(InMemoryLocationStore::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
