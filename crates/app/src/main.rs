use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::tao::dpi::LogicalSize;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, SettingsService, SurveyService};
use storage::OutputEncoding;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidEncoding { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidEncoding { raw } => {
                write!(f, "invalid --encoding value: {raw} (expected utf-8 or shift-jis)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    survey: Arc<SurveyService>,
    settings: Arc<SettingsService>,
}

impl UiApp for DesktopApp {
    fn survey(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey)
    }

    fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }
}

struct Args {
    data_dir: PathBuf,
    encoding: OutputEncoding,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--data-dir <dir>] [--encoding <utf-8|shift-jis>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir .");
    eprintln!("  --encoding utf-8");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TEMPO_DATA_DIR, TEMPO_OUTPUT_ENCODING");
}

fn parse_encoding(raw: &str) -> Result<OutputEncoding, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(OutputEncoding::Utf8),
        "shift-jis" | "shift_jis" | "sjis" => Ok(OutputEncoding::ShiftJis),
        _ => Err(ArgsError::InvalidEncoding {
            raw: raw.to_string(),
        }),
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_dir = std::env::var("TEMPO_DATA_DIR")
            .ok()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        let mut encoding = std::env::var("TEMPO_OUTPUT_ENCODING")
            .ok()
            .and_then(|value| parse_encoding(&value).ok())
            .unwrap_or_default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    data_dir = PathBuf::from(require_value(args, "--data-dir")?);
                }
                "--encoding" => {
                    let value = require_value(args, "--encoding")?;
                    encoding = parse_encoding(&value)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { data_dir, encoding })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Build services at startup. Keep this in the binary glue so core/services
    // stay pure; a malformed question file fails the launch here instead of
    // the first survey.
    let services = AppServices::new_csv(&parsed.data_dir, parsed.encoding, Clock::default_clock())?;

    let desktop_app = DesktopApp {
        survey: services.survey(),
        settings: services.settings(),
    };
    let app: Arc<dyn UiApp> = Arc::new(desktop_app);
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Tempo")
            .with_always_on_top(false)
            .with_inner_size(LogicalSize::new(480.0, 560.0)),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
