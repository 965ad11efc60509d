use eframe::egui;
use field_overlay::gui::SigningDemoApp;
use field_overlay::logging;
use field_overlay::settings::Settings;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(
        settings.debug_logging,
        settings.log_file.as_ref().map(PathBuf::from),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 1000.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Field overlay preview",
        native_options,
        Box::new(move |_cc| Box::new(SigningDemoApp::new(settings))),
    )
    .map_err(|e| anyhow::anyhow!("run preview window: {e}"))
}
