use clap::{Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::time::Duration;

use liblcm_frontend::error::FormError;
use liblcm_frontend::form::ConfigForm;
use liblcm_frontend::settings::Settings;
use liblcm_frontend::trigger_rate::TriggerRate;

fn make_template_settings(path: &Path) {
    let settings = Settings::default();
    match settings.write_settings_file(path) {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Could not write template settings: {e}"),
    }
}

/// Log every field of the form with its display value
fn show_config(settings: &Settings) -> Result<(), FormError> {
    let form = ConfigForm::load(&settings.config_path)?;
    for field in form.fields.iter() {
        log::info!(
            "{:<18} {:<28} {} {}",
            field.spec.key,
            field.spec.title(),
            field.text,
            field.spec.unit().unwrap_or("")
        );
    }
    Ok(())
}

/// Apply KEY=VALUE edits and save. Nothing is written unless every field validates.
fn set_config(settings: &Settings, edits: &[String]) -> Result<(), FormError> {
    let mut form = ConfigForm::load(&settings.config_path)?;
    form.apply_edits(edits)?;
    form.save(settings.backup_policy)?;
    log::info!("Saved {}", settings.config_path.to_string_lossy());
    Ok(())
}

fn main() {
    // Create a cli
    let matches = Command::new("lcm_frontend_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template settings yaml file"))
        .subcommand(Command::new("show").about("Show the fields of the configuration file"))
        .subcommand(
            Command::new("set")
                .about("Edit fields of the configuration file")
                .arg(
                    Arg::new("edits")
                        .help("Edits of the form KEY=VALUE, in display units")
                        .required(true)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("trigger-rate")
                .about("Compute the trigger rate of an LBNEWare CSV export")
                .arg(Arg::new("file").help("Path to the CSV file").required(true)),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the settings file"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to the configuration file, overriding the settings"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }
    log::set_max_level(simplelog::LevelFilter::Info);

    let settings_path = matches.get_one::<String>("path").map(PathBuf::from);

    if let Some(("new", _)) = matches.subcommand() {
        let Some(path) = settings_path else {
            log::error!("A settings path (-p) is required to make a template");
            return;
        };
        log::info!(
            "Making a template settings file at {}...",
            path.to_string_lossy()
        );
        make_template_settings(&path);
        return;
    }

    // Load our settings
    let mut settings = match settings_path {
        Some(path) => {
            log::info!("Loading settings from {}...", path.to_string_lossy());
            match Settings::read_settings_file(&path) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("{e}");
                    return;
                }
            }
        }
        None => Settings::default(),
    };
    if let Some(config) = matches.get_one::<String>("config") {
        settings.config_path = PathBuf::from(config);
    }

    match matches.subcommand() {
        Some(("show", _)) => {
            log::info!("Config Path: {}", settings.config_path.to_string_lossy());
            if let Err(e) = show_config(&settings) {
                log::error!("{e}");
            }
        }
        Some(("set", sub)) => {
            let edits: Vec<String> = sub
                .get_many::<String>("edits")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            log::info!("Config Path: {}", settings.config_path.to_string_lossy());
            log::info!("Backup Policy: {:?}", settings.backup_policy);
            if let Err(e) = set_config(&settings, &edits) {
                log::error!("Configuration was not saved: {e}");
            }
        }
        Some(("trigger-rate", sub)) => {
            let Some(file) = sub.get_one::<String>("file") else {
                log::error!("A CSV file is required");
                return;
            };
            let pb = pb_manager.add(ProgressBar::new_spinner());
            pb.set_message(format!("Reading {file}"));
            pb.enable_steady_tick(Duration::from_millis(100));
            let result = TriggerRate::from_file(Path::new(file));
            pb.finish_and_clear();
            match result {
                Ok(rate) => {
                    log::info!("Events: {}", rate.n_events);
                    log::info!("Duration: {:.6} s", rate.duration_seconds());
                    log::info!("Trigger rate: {:.3} Hz", rate.rate_hz());
                }
                Err(e) => log::error!("Trigger rate failed with error: {e}"),
            }
        }
        _ => log::error!("Unrecognized subcommand"),
    }
}
