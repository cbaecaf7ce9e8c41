use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::data::{NetworkData, load_network_data};
use crate::viz::{GalaxySimulation, TreeSpacing, ViewConfig};

mod interaction;
mod render_utils;
mod scene;
mod ui;
mod view;

use scene::SceneCache;

pub struct ReferralScopeApp {
    data_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<NetworkData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<NetworkData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    network: NetworkData,
    config: ViewConfig,
    tree_spacing: TreeSpacing,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    scene_dirty: bool,
    scene: Option<SceneCache>,
    galaxy: Option<GalaxySimulation>,
    top_by_score: Vec<String>,
    top_by_value: Vec<String>,
    top_by_referrals: Vec<String>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

impl ReferralScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: String) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: String) -> Receiver<Result<NetworkData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_network_data(&data_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for ReferralScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(network) => AppState::Ready(Box::new(ViewModel::new(network))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading referral network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the referral network export");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(network) => AppState::Ready(Box::new(ViewModel::new(network))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    const RANKING_ROWS: usize = 12;

    fn new(network: NetworkData) -> Self {
        let top_by_score = network.top_by_score(Self::RANKING_ROWS);
        let top_by_value = network.top_by_deal_value(Self::RANKING_ROWS);
        let top_by_referrals = network.top_by_referrals(Self::RANKING_ROWS);

        Self {
            network,
            config: ViewConfig::default(),
            tree_spacing: TreeSpacing::default(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            scene_dirty: true,
            scene: None,
            galaxy: None,
            top_by_score,
            top_by_value,
            top_by_referrals,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    fn show(
        &mut self,
        ctx: &Context,
        data_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("referral-scope");
                    ui.separator();
                    ui.label(&self.network.organization);
                    ui.label(format!("contacts: {}", self.network.contact_count()));
                    ui.label(format!("referrals: {}", self.network.referral_count()));
                    ui.label(format!("export: {data_path}"));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload export"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            if let Some(fps_text) = self.fps_display_text() {
                                ui.label(fps_text);
                            }
                            ui.label(format!(
                                "in view: {} nodes / {} edges",
                                self.visible_node_count, self.visible_edge_count
                            ));
                        },
                    );
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading referral network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_canvas(ui);
            }
        });
    }

    fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            self.selected = selected;
        }
    }

    fn mark_scene_dirty(&mut self) {
        self.scene_dirty = true;
    }
}
