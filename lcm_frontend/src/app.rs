use std::path::{Path, PathBuf};

use eframe::egui::{Color32, ComboBox, RichText, Ui};
use rfd::FileDialog;

use liblcm_frontend::error::FormError;
use liblcm_frontend::fields::{Channel, FieldKind, LCM_FIELDS};
use liblcm_frontend::form::{ConfigForm, FormField};
use liblcm_frontend::settings::Settings;

const CHANNELS: [Channel; 3] = [Channel::IU, Channel::TPC, Channel::PD];

fn render_error_dialog(show: &mut bool, ctx: &eframe::egui::Context) {
    eframe::egui::Window::new("Error")
        .open(show)
        .show(ctx, |ui| {
            ui.label(
                "There was an error! Check the log file lcm_frontend.log for more information.",
            )
        });
}

fn render_warning_dialog(warning: &mut Option<String>, ctx: &eframe::egui::Context) {
    let mut open = warning.is_some();
    if let Some(msg) = warning.as_ref() {
        eframe::egui::Window::new("Invalid input")
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(msg.as_str());
                ui.label("Nothing was written.");
            });
    }
    if !open {
        *warning = None;
    }
}

/// Label text for a field, with its allowed range if numeric
fn field_caption(field: &FormField) -> String {
    match (field.spec.bounds(), field.spec.unit()) {
        (Some((min, max)), Some(unit)) => format!("{} ({min} to {max} {unit}):", field.spec.label),
        (Some((min, max)), None) => format!("{} ({min} to {max}):", field.spec.label),
        _ => format!("{}:", field.spec.label),
    }
}

/// The editing widget for one field
fn render_field_widget(ui: &mut Ui, field: &mut FormField) {
    match field.spec.kind {
        FieldKind::Choice(options) => {
            ComboBox::from_id_salt(field.spec.key)
                .selected_text(field.text.as_str())
                .show_ui(ui, |ui| {
                    for opt in options.iter() {
                        ui.selectable_value(&mut field.text, opt.to_string(), *opt);
                    }
                });
        }
        _ => {
            ui.horizontal(|ui| {
                ui.add(
                    eframe::egui::TextEdit::singleline(&mut field.text).desired_width(120.0),
                );
                if let Some(unit) = field.spec.unit() {
                    ui.label(unit);
                }
            });
        }
    }
}

/// The UI app which inherits the eframe::App trait.
///
/// Owns the editing session; nothing is kept outside of it.
#[derive(Debug)]
pub struct FrontendApp {
    settings: Settings,
    form: Option<ConfigForm>,
    show_error_window: bool,
    warning: Option<String>,
    status: String,
}

impl FrontendApp {
    /// Create the application
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut visuals = eframe::egui::Visuals::dark();
        visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        cc.egui_ctx.set_visuals(visuals);
        let mut app = FrontendApp {
            settings,
            form: None,
            show_error_window: false,
            warning: None,
            status: String::new(),
        };
        app.load_form();
        app
    }

    /// (Re)load the configuration file named in the settings
    fn load_form(&mut self) {
        match ConfigForm::load(&self.settings.config_path) {
            Ok(form) => {
                spdlog::info!("Loaded {}", self.settings.config_path.display());
                self.status = format!("Loaded {}", self.settings.config_path.display());
                self.form = Some(form);
            }
            Err(e) => {
                spdlog::error!("{}", e);
                self.status = format!("Could not load {}", self.settings.config_path.display());
                self.form = None;
            }
        }
    }

    /// Validate every field and write the configuration file
    fn save_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.save(self.settings.backup_policy) {
            Ok(()) => {
                self.status = format!("Saved {}", form.path().display());
            }
            Err(FormError::Validation(e)) => {
                spdlog::warn!("{}", e);
                self.warning = Some(e.to_string());
            }
            Err(e) => {
                spdlog::error!("Saving failed with error: {e}");
                self.show_error_window = true;
            }
        }
    }

    /// Write the current Settings to a file
    fn write_settings(&mut self, path: &Path) {
        if let Err(e) = self.settings.write_settings_file(path) {
            self.show_error_window = true;
            spdlog::error!("Could not write settings to {}: {}", path.display(), e);
        }
    }

    /// Read the Settings from a file
    fn read_settings(&mut self, path: &Path) {
        match Settings::read_settings_file(path) {
            Ok(settings) => {
                self.settings = settings;
                self.load_form();
            }
            Err(e) => spdlog::error!("{}", e),
        }
    }

    fn start_dir(&self) -> PathBuf {
        self.settings
            .config_path
            .parent()
            .map(|p| p.to_path_buf())
            .filter(|p| p.exists())
            .unwrap_or(PathBuf::from("."))
    }

    fn render_form(ui: &mut Ui, form: &mut ConfigForm) {
        eframe::egui::Grid::new("GlobalGrid").show(ui, |ui| {
            for field in form.fields.iter_mut().filter(|f| f.spec.channel.is_none()) {
                ui.label(field_caption(field));
                render_field_widget(ui, field);
                ui.end_row();
            }
        });

        ui.separator();
        // One row per register field, one column per channel
        let mut row_labels: Vec<&'static str> = vec![];
        for spec in LCM_FIELDS.iter().filter(|s| s.channel.is_some()) {
            if !row_labels.contains(&spec.label) {
                row_labels.push(spec.label);
            }
        }
        eframe::egui::Grid::new("ChannelGrid").show(ui, |ui| {
            ui.label("");
            for ch in CHANNELS.iter() {
                ui.label(RichText::new(ch.name()).strong());
            }
            ui.end_row();
            for label in row_labels.iter() {
                let mut caption_done = false;
                for ch in CHANNELS.iter() {
                    let idx = form
                        .fields
                        .iter()
                        .position(|f| f.spec.label == *label && f.spec.channel == Some(*ch));
                    let Some(idx) = idx else {
                        ui.label("");
                        continue;
                    };
                    if !caption_done {
                        ui.label(field_caption(&form.fields[idx]));
                        caption_done = true;
                    }
                    render_field_widget(ui, &mut form.fields[idx]);
                }
                ui.end_row();
            }
        });
    }
}

impl eframe::App for FrontendApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        render_error_dialog(&mut self.show_error_window, ctx);
        render_warning_dialog(&mut self.warning, ctx);
        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            //Menus
            ui.menu_button("File", |ui| {
                if ui.button("Open Settings...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_directory(self.start_dir())
                        .add_filter("YAML file", &["yaml", "yml"])
                        .pick_file()
                    {
                        self.read_settings(&path);
                    }
                }
                if ui.button("Save Settings...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_directory(self.start_dir())
                        .add_filter("YAML file", &["yaml", "yml"])
                        .save_file()
                    {
                        self.write_settings(&path);
                    }
                }
                if ui.button("Open Config...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_directory(self.start_dir())
                        .add_filter("LCM config", &["conf", "txt"])
                        .pick_file()
                    {
                        self.settings.config_path = path;
                        self.load_form();
                    }
                }
            });

            ui.separator();
            ui.label(
                RichText::new("Calibration Module Configuration")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            ui.label(format!(
                "Config file: {}",
                self.settings.config_path.display()
            ));
            ui.separator();

            match self.form.as_mut() {
                Some(form) => Self::render_form(ui, form),
                None => {
                    ui.label("No configuration loaded. Use File->Open Config...");
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.form.is_some(), eframe::egui::Button::new("Run"))
                    .clicked()
                {
                    spdlog::info!("Writing configuration...");
                    self.save_form();
                }
                if ui.button("Reload").clicked() {
                    self.load_form();
                }
            });
            ui.label(self.status.as_str());
        });
    }
}
