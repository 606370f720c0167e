// src/app.rs
use eframe::egui;
use rfd::FileDialog;
use std::path::PathBuf;

use crate::state::{AppState, Screen};

pub struct FacetApp {
    state: AppState,
}

impl FacetApp {
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    fn show_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open CSV…").clicked() {
                    self.open_csv();
                    ui.close_menu();
                }
                let can_reload = self.state.dataset_path.is_some();
                if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                    if let Some(path) = self.state.dataset_path.clone() {
                        self.load(path);
                    }
                    ui.close_menu();
                }
            });

            ui.separator();

            // Tab selection using buttons
            let tabs = [
                (Screen::Explorer, "Data Vis"),
                (Screen::Dashboard, "Dashboard"),
            ];

            for (screen, label) in tabs {
                if ui.selectable_label(self.state.current_screen == screen, label).clicked() {
                    self.state.current_screen = screen;
                }
            }
        });
    }

    fn open_csv(&mut self) {
        let mut dialog = FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .set_title("Open Dataset");
        if let Some(dir) = &self.state.settings.last_data_dir {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.load(path);
        }
    }

    fn load(&mut self, path: PathBuf) {
        if let Err(e) = self.state.load_dataset(path) {
            self.state.error_message = Some(format!("Error loading dataset: {:#}", e));
        }
    }
}

impl eframe::App for FacetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_topology();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_menu(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.current_screen {
                Screen::Explorer => {
                    crate::ui::explorer::show_explorer_view(ui, &mut self.state);
                }
                Screen::Dashboard => {
                    crate::ui::dashboard::show_dashboard_view(ui, &mut self.state);
                }
            }
        });

        // Show error modal if needed
        let error_msg = self.state.error_message.clone();
        if let Some(error) = error_msg {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.error_message = None;
                    }
                });
        }
    }
}
