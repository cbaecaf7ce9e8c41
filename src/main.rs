use clap::Parser;

use referral_scope::app::ReferralScopeApp;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "demos/network.json")]
    data: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "referral-scope",
        options,
        Box::new(move |cc| Ok(Box::new(ReferralScopeApp::new(cc, args.data.clone())))),
    )
}
