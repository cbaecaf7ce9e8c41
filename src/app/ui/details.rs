use eframe::egui::{self, RichText, Ui};

use crate::util::format_currency;
use crate::viz::category_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Contact Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a contact in any view, or pick one from the rankings below.");
            ui.separator();
            self.draw_rankings(ui);
            return;
        };

        let Some(contact) = self.network.contact(&selected_id) else {
            ui.label("The selected contact is not part of the current export.");
            if ui.button("Clear selection").clicked() {
                self.set_selected(None);
            }
            return;
        };

        let display_name = contact.display_name();
        let company = contact.company.clone();
        let industry = contact.industry.clone();
        let relationship = category_label(&contact.relationship_type).to_string();
        let generation = contact.generation;
        let referral_score = contact.referral_score;
        let referral_count = contact.referral_count;
        let deal_value = contact.deal_value;
        let exchange_direction = contact.exchange_direction;

        ui.label(RichText::new(display_name).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        if !company.trim().is_empty() {
            ui.label(format!("Company: {company}"));
        }
        if !industry.trim().is_empty() {
            ui.label(format!("Industry: {industry}"));
        }
        ui.label(format!("Relationship: {relationship}"));
        ui.label(format!("Generation: {generation}"));
        ui.label(format!("Referral score: {referral_score:.1}"));
        ui.label(format!("Referrals made: {referral_count}"));
        ui.label(format!("Deal value: {}", format_currency(deal_value)));
        if let Some(direction) = exchange_direction {
            ui.label(
                RichText::new(format!("Exchange partner · {}", direction.label()))
                    .color(egui::Color32::from_rgb(216, 176, 92)),
            );
        }

        ui.add_space(6.0);
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
            return;
        }

        let (referred, referred_by) = self.referral_neighbors(&selected_id);
        let mut pending = None;

        ui.separator();
        ui.label(RichText::new("Referred contacts").strong());
        if referred.is_empty() {
            ui.label("No outgoing referrals in the current view.");
        }
        for (id, label) in &referred {
            if ui.link(label).clicked() {
                pending = Some(id.clone());
            }
        }

        ui.add_space(4.0);
        ui.label(RichText::new("Referred by").strong());
        if referred_by.is_empty() {
            ui.label("No incoming referrals in the current view.");
        }
        for (id, label) in &referred_by {
            if ui.link(label).clicked() {
                pending = Some(id.clone());
            }
        }

        if let Some(id) = pending {
            self.set_selected(Some(id));
        }
    }

    fn referral_neighbors(&self, selected_id: &str) -> NeighborLists {
        let mut referred = Vec::new();
        let mut referred_by = Vec::new();

        let Some(scene) = self.scene.as_ref() else {
            return (referred, referred_by);
        };
        let Some(selected_index) = scene.viz.index_of(selected_id) else {
            return (referred, referred_by);
        };

        for &(source, target) in &scene.edges {
            if source == selected_index {
                if let Some(node) = scene.viz.nodes.get(target) {
                    referred.push((node.id.clone(), node.label.clone()));
                }
            } else if target == selected_index
                && let Some(node) = scene.viz.nodes.get(source)
            {
                referred_by.push((node.id.clone(), node.label.clone()));
            }
        }

        (referred, referred_by)
    }

    fn draw_rankings(&mut self, ui: &mut Ui) {
        let mut pending = None;

        self.ranking_section(ui, "Top referral scores", &self.top_by_score, |model, id| {
            model
                .network
                .contact(id)
                .map(|contact| format!("{}  ({:.1})", contact.display_name(), contact.referral_score))
        }, &mut pending);

        self.ranking_section(ui, "Top deal values", &self.top_by_value, |model, id| {
            model.network.contact(id).map(|contact| {
                format!(
                    "{}  ({})",
                    contact.display_name(),
                    format_currency(contact.deal_value)
                )
            })
        }, &mut pending);

        self.ranking_section(ui, "Most referrals", &self.top_by_referrals, |model, id| {
            model
                .network
                .contact(id)
                .map(|contact| format!("{}  ({})", contact.display_name(), contact.referral_count))
        }, &mut pending);

        if let Some(id) = pending {
            self.set_selected(Some(id));
        }
    }

    fn ranking_section(
        &self,
        ui: &mut Ui,
        title: &str,
        ids: &[String],
        describe: impl Fn(&Self, &str) -> Option<String>,
        pending: &mut Option<String>,
    ) {
        ui.label(RichText::new(title).strong());
        if ids.is_empty() {
            ui.label("No contacts in the export.");
        }
        for id in ids {
            let Some(label) = describe(self, id) else {
                continue;
            };
            if ui.link(label).clicked() {
                *pending = Some(id.clone());
            }
        }
        ui.add_space(6.0);
    }
}

type NeighborLists = (Vec<(String, String)>, Vec<(String, String)>);
