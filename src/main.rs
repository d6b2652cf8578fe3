//! Flow Studio - step-flow canvas for product docs
//! Built with egui for native Wayland support

use clap::Parser;
use eframe::egui::{self, Color32, RichText, Stroke};
use flow_studio::{FlowDocument, FlowViewer, StepStore, StudioConfig};
use std::path::PathBuf;

/// Standard spacing between sections
const SECTION_SPACING: f32 = 12.0;
/// Standard spacing between elements within a section
const ELEMENT_SPACING: f32 = 8.0;

#[derive(Parser)]
#[command(name = "flow-studio")]
#[command(about = "Interactive step-flow canvas")]
struct Args {
    /// Flow document to open (JSON)
    file: Option<PathBuf>,

    /// Use this config file instead of ~/.config/flow-studio/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => StudioConfig::load_from(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {:?}: {}", path, e);
            StudioConfig::default()
        }),
        None => StudioConfig::load(),
    };

    let store = match args.file {
        Some(ref path) => StepStore::open(path).unwrap_or_else(|e| {
            log::error!("Failed to open {}: {}", path.display(), e);
            StepStore::new(FlowDocument::sample())
        }),
        None => StepStore::new(FlowDocument::sample()),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Flow Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Flow Studio",
        options,
        Box::new(move |cc| {
            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, Color32::from_rgb(0, 120, 212));
            cc.egui_ctx.set_style(style);

            Ok(Box::new(FlowStudio::new(&config, store)))
        }),
    )
}

struct FlowStudio {
    viewer: FlowViewer,
    store: StepStore,
    status: Option<String>,
}

impl FlowStudio {
    fn new(config: &StudioConfig, store: StepStore) -> Self {
        Self {
            viewer: FlowViewer::from_config(config),
            store,
            status: None,
        }
    }

    fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("Flow", &["json"]).pick_file() else {
            return;
        };

        match StepStore::open(&path) {
            Ok(store) => {
                self.status = Some(format!("Opened {}", path.display()));
                self.store = store;
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.status = Some(format!("⚠ {}", e));
            }
        }
    }

    fn save_file_as(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Flow", &["json"])
            .set_file_name("flow.json")
            .save_file()
        else {
            return;
        };

        self.status = Some(match self.store.save_as(&path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("Failed to save {}: {}", path.display(), e);
                format!("⚠ {}", e)
            }
        });
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        let document = self.store.document();
        let title = document.name.clone().unwrap_or_else(|| "Untitled flow".to_string());
        ui.heading(title);
        match self.store.path() {
            Some(path) => ui.label(RichText::new(path.display().to_string()).small().weak()),
            None => ui.label(RichText::new("Not saved").small().weak()),
        };

        ui.add_space(ELEMENT_SPACING);
        let mut open = false;
        let mut save_as = false;
        ui.horizontal(|ui| {
            open = ui.button("📂 Open...").clicked();
            save_as = ui.button("💾 Save as...").clicked();
        });

        ui.add_space(SECTION_SPACING);
        ui.separator();
        ui.label(RichText::new(format!("{} steps", document.steps.len())).strong());

        let screens = document.screen_lookup();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (i, step) in document.steps.iter().enumerate() {
                ui.add_space(ELEMENT_SPACING / 2.0);
                ui.label(format!("{}. {}", i + 1, step.description));
                if let Some(name) = step.screen_ref.as_ref().and_then(|s| screens.get(s)) {
                    ui.label(RichText::new(format!("   ▣ {}", name)).small().weak());
                }
            }
        });

        if let Some(ref status) = self.status {
            ui.add_space(SECTION_SPACING);
            ui.label(RichText::new(status).small());
        }

        if open {
            self.open_file();
        }
        if save_as {
            self.save_file_as();
        }
    }
}

impl eframe::App for FlowStudio {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screens = self.store.document().screen_lookup();
        self.viewer.canvas.sync(self.store.steps(), &screens);

        egui::SidePanel::left("steps")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.side_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.viewer.ui(ui, &mut self.store));
    }
}
