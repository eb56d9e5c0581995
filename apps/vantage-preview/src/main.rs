mod app;
mod fixtures;

use eframe::egui;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_JSON_ENV: &str = "VANTAGE_LOG_JSON";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LaunchOptions {
    case: Option<String>,
    fragment: Option<String>,
}

fn main() -> Result<(), eframe::Error> {
    init_tracing();

    let options = match launch_options_from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("Vantage startup error: {error}");
            return Ok(());
        }
    };

    let app = match app::PreviewApp::new(options.case.as_deref(), options.fragment.as_deref()) {
        Ok(app) => app,
        Err(error) => {
            tracing::error!(%error, "failed to mount case study");
            eprintln!("Vantage startup error: {error}");
            return Ok(());
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vantage Preview")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vantage Preview",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool(LOG_JSON_ENV, false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

fn launch_options_from_args<I>(args: I) -> Result<LaunchOptions, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--case" => {
                let slug = args
                    .next()
                    .ok_or_else(|| "missing case slug after --case".to_owned())?;
                if fixtures::find(&slug).is_none() {
                    return Err(format!(
                        "unknown case study `{slug}` (expected: {})",
                        fixtures::slugs().join("|")
                    ));
                }
                options.case = Some(slug);
            }
            "--fragment" => {
                let fragment = args
                    .next()
                    .ok_or_else(|| "missing anchor after --fragment".to_owned())?;
                options.fragment = Some(fragment);
            }
            other => return Err(format!("unsupported argument `{other}`")),
        }
    }
    Ok(options)
}
