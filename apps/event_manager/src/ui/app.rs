use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiAction, UiEvent},
    EventController,
};
use crate::ui::view::{EventForm, EventRow, FormId, ListItem};

const ROW_NAME_WIDTH: f32 = 200.0;
const DATE_INPUT_WIDTH: f32 = 110.0;
const BANNER_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);

pub struct EventManagerApp {
    controller: EventController,
    ui_rx: Receiver<UiEvent>,
    api_url: String,
}

impl EventManagerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, api_url: String) -> Self {
        let mut controller = EventController::new(cmd_tx);
        controller.init();
        Self {
            controller,
            ui_rx,
            api_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_ui_event(event);
        }
    }

    fn show_toolbar(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Events");
                ui.separator();
                if ui.button("Add event").clicked() {
                    actions.push(UiAction::NewEventClicked);
                }
                if ui
                    .button("Remove expired")
                    .on_hover_text("Delete every event whose end date is before today")
                    .clicked()
                {
                    actions.push(UiAction::SweepExpiredClicked);
                }
                if ui.button("Reload").clicked() {
                    actions.push(UiAction::ReloadClicked);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{} events", self.controller.model().len()));
                });
            });

            if let Some(banner) = self.controller.status_banner() {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(BANNER_COLOR, banner.message.as_str());
                    if ui.small_button("Dismiss").clicked() {
                        actions.push(UiAction::DismissBanner);
                    }
                });
            }
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(self.api_url.as_str());
                ui.separator();
                ui.label(self.controller.status());
            });
        });
    }

    fn show_event_list(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let view = self.controller.view_mut();
        let focus = view.take_new_form();

        egui::CentralPanel::default().show(ctx, |ui| {
            if view.is_empty() {
                ui.weak("No events yet. Use \"Add event\" to create one.");
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for item in view.items_mut() {
                        match item {
                            ListItem::Row(row) => event_row(ui, row, actions),
                            ListItem::Form(form) => event_form(ui, form, focus, actions),
                        }
                    }
                });
        });
    }
}

fn event_row(ui: &mut egui::Ui, row: &EventRow, actions: &mut Vec<UiAction>) {
    ui.push_id(("row", row.id.as_str()), |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized(
                    [ROW_NAME_WIDTH, 20.0],
                    egui::Label::new(egui::RichText::new(row.event_name.as_str()).strong())
                        .truncate(),
                );
                ui.label(row.start_date.as_str());
                ui.label("to");
                ui.label(row.end_date.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Delete").clicked() {
                        actions.push(UiAction::DeleteClicked(row.id.clone()));
                    }
                    if ui.button("Edit").clicked() {
                        actions.push(UiAction::EditClicked(row.id.clone()));
                    }
                });
            });
        });
    });
}

/// Enter in the end-date field submits, like a browser form.
fn event_form(
    ui: &mut egui::Ui,
    form: &mut EventForm,
    focus: Option<FormId>,
    actions: &mut Vec<UiAction>,
) {
    let form_id = form.form_id;
    ui.push_id(("form", form_id.0), |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                let editable = !form.pending;
                let name = ui.add_enabled(
                    editable,
                    egui::TextEdit::singleline(&mut form.event_name)
                        .hint_text("Event name")
                        .desired_width(ROW_NAME_WIDTH),
                );
                if focus == Some(form_id) {
                    name.request_focus();
                }
                ui.add_enabled(
                    editable,
                    egui::TextEdit::singleline(&mut form.start_date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(DATE_INPUT_WIDTH),
                );
                let end = ui.add_enabled(
                    editable,
                    egui::TextEdit::singleline(&mut form.end_date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(DATE_INPUT_WIDTH),
                );
                let entered = end.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if ui.add_enabled(editable, egui::Button::new("Save")).clicked() || entered {
                    actions.push(UiAction::SubmitForm(form_id));
                }
                if ui.add_enabled(editable, egui::Button::new("Delete")).clicked() {
                    actions.push(UiAction::DiscardForm(form_id));
                }
                if form.pending {
                    ui.spinner();
                }
            });
        });
    });
}

impl eframe::App for EventManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        self.show_toolbar(ctx, &mut actions);
        self.show_status_bar(ctx);
        self.show_event_list(ctx, &mut actions);

        for action in actions {
            self.controller.handle_action(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
