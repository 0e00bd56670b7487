//! # lcm_frontend
//!
//! Part of the lcm_frontend crate family.
//!
//! This is the application to edit the LBNE calibration module configuration with a GUI
//! using [egui](https://github.com/emilk/egui).
//!
//! ## Install
//!
//! Use `cargo install --path ./lcm_frontend`
//!
//! ## Use
//!
//! To launch the application simply invoke it after it is installed
//!
//! ```bash
//! lcm_frontend
//! ```
//!
//! The application reads `lcm_frontend.yml` from the working directory if present, and
//! otherwise edits `$PROJECT_ROOT/lcm.conf`. Fill out the fields and click the Run button
//! to validate and write the configuration. If any field is invalid a warning names it and
//! nothing is written.
//!
//! Settings can be saved using File->Save Settings and loaded using File->Open Settings.
//! A different configuration file can be picked with File->Open Config.

mod app;
use app::FrontendApp;
use liblcm_frontend::settings::Settings;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SETTINGS_FILE: &str = "./lcm_frontend.yml";

fn init_logging() -> Result<(), spdlog::Error> {
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from("./lcm_frontend.log"))
            .truncate(true)
            .build()?,
    );
    let logger = Arc::new(
        spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(file_sink)
            .build()?,
    );
    spdlog::set_default_logger(logger);
    Ok(())
}

/// The program entry point
fn main() {
    // Setup logging to a file
    if let Err(e) = init_logging() {
        eprintln!("Could not create log file: {e}");
    }
    spdlog::info!("Starting LCM front end UI");

    let settings_path = Path::new(SETTINGS_FILE);
    let settings = if settings_path.exists() {
        match Settings::read_settings_file(settings_path) {
            Ok(s) => s,
            Err(e) => {
                spdlog::error!("{}", e);
                Settings::default()
            }
        }
    } else {
        Settings::default()
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("ANL Calibration Module Front End")
            .with_inner_size(eframe::epaint::vec2(760.0, 480.0))
            .with_min_inner_size(eframe::epaint::vec2(600.0, 400.0)),
        ..Default::default()
    };
    match eframe::run_native(
        "lcm_frontend",
        native_options,
        Box::new(move |cc| Ok(Box::new(FrontendApp::new(cc, settings)))),
    ) {
        Ok(()) => (),
        Err(e) => spdlog::error!("Eframe error: {}", e),
    }
}
