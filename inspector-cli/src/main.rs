//! ui-inspect - replay inspection gestures against a recorded scan.

use anyhow::Context;
use clap::Parser;
use inspector_cli::{
    describe_segments, format_tree, load_session, CliArgs, Command, InspectConfig, StateReport,
};
use inspector_core::{hit_test, relative_distances, ElementId, InspectorGesture, Point, SharedSettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = InspectConfig::from_args(&args)?;
    tracing::debug!("Resolved settings: {:?}", config.settings);

    let settings = SharedSettings::new(config.settings);
    let mut session = load_session(&config.snapshot, &settings)?;
    let unit_mode = config.settings.unit_mode;
    let density = config.settings.density;

    match args.command {
        Command::Tree => {
            print!("{}", format_tree(&session.snapshot()));
        }
        Command::Hit { x, y } => {
            let point = Point::new(x, y);
            match hit_test(session.all_elements(), point) {
                Some(element) => {
                    println!("{} {}", element.id, element.properties.identifier());
                    for line in element.properties.detail_lines(unit_mode, density) {
                        println!("  {}: {}", line.label, line.value);
                    }
                }
                None => println!("Nothing at ({x}, {y})"),
            }
        }
        Command::Measure { primary, secondary } => {
            let tree = session.snapshot();
            let a = tree
                .get(ElementId(primary))
                .with_context(|| format!("No element with id {primary}"))?;
            let b = tree
                .get(ElementId(secondary))
                .with_context(|| format!("No element with id {secondary}"))?;
            let segments = relative_distances(&a.bounds, &b.bounds);
            if segments.is_empty() {
                println!("No gaps between {} and {}", a.id, b.id);
            }
            for line in describe_segments(&segments, unit_mode, density) {
                println!("{line}");
            }
        }
        Command::Replay { gestures } => {
            let contents = std::fs::read_to_string(&gestures)
                .with_context(|| format!("Failed to read {}", gestures.display()))?;
            let gestures: Vec<InspectorGesture> =
                serde_json::from_str(&contents).context("Failed to parse gesture list")?;

            for (step, gesture) in gestures.iter().enumerate() {
                let changed = session.handle_gesture(gesture);
                let report = StateReport::capture(&session, step, changed, unit_mode, density);
                println!("{}", serde_json::to_string(&report)?);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inspector_core=debug"));

    // Logs go to stderr so stdout stays machine-readable.
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v == "json");
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}
