//! UI panels for the application
//!
//! The sidebar holds the entry form and the list of logged workouts. It sits
//! on the right in landscape and at the bottom in portrait. Panels never
//! mutate the log directly: anything beyond editing the draft is returned as
//! a [`SidebarAction`] for the app to carry out.

use crate::app::plugin::type_accent;
use egui::{Color32, RichText, Ui};
use workout_map_lib::{Controller, Field, FormState, WorkoutId, WorkoutRow, WorkoutType};

/// Seconds the entry form takes to fade in or out
pub const FORM_FADE_SECONDS: f32 = 0.4;

/// Something the user asked for in the sidebar
#[derive(Clone, Debug, PartialEq)]
pub enum SidebarAction {
    Submit,
    Select(WorkoutId),
    Reset,
}

/// Render the main sidebar (responsive: side on landscape, bottom on portrait)
pub fn render_sidebar(ctx: &egui::Context, controller: &mut Controller) -> Option<SidebarAction> {
    let screen_size = ctx.viewport_rect().size();
    let is_portrait = screen_size.y > screen_size.x;

    let form_opacity = ctx.animate_bool_with_time(
        egui::Id::new("workout_form_fade"),
        controller.is_form_visible(),
        FORM_FADE_SECONDS,
    );

    let mut action = None;
    if is_portrait {
        egui::TopBottomPanel::bottom("main_sidebar")
            .default_height(280.0)
            .min_height(180.0)
            .max_height(ctx.viewport_rect().height() * 0.6)
            .resizable(true)
            .show(ctx, |ui| {
                action = render_sidebar_content(ui, controller, form_opacity);
            });
    } else {
        egui::SidePanel::right("main_sidebar")
            .default_width(320.0)
            .min_width(260.0)
            .max_width(450.0)
            .resizable(true)
            .show(ctx, |ui| {
                action = render_sidebar_content(ui, controller, form_opacity);
            });
    }
    action
}

fn render_sidebar_content(
    ui: &mut Ui,
    controller: &mut Controller,
    form_opacity: f32,
) -> Option<SidebarAction> {
    let mut action = None;

    ui.heading("🗺 Workout Map");
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if form_opacity > 0.0
                && let Some(a) = render_form(ui, controller, form_opacity)
            {
                action = Some(a);
            }

            if let Some(a) = render_workout_list(ui, &controller.rows()) {
                action = Some(a);
            }

            ui.add_space(12.0);
            if let Some(a) = render_developer_section(ui, controller) {
                action = Some(a);
            }
        });

    action
}

/// Entry form, faded by `opacity` and read-only while fading out
fn render_form(ui: &mut Ui, controller: &mut Controller, opacity: f32) -> Option<SidebarAction> {
    profiling::scope!("render_form");

    let mut action = None;
    let focus = controller.take_focus_request();
    let visible = controller.is_form_visible();

    ui.scope(|ui| {
        ui.multiply_opacity(opacity);
        ui.add_enabled_ui(visible, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());

                if let FormState::AwaitingInput { coords } = controller.form_state() {
                    ui.label(RichText::new(format!("📍 New workout at {}", coords)).strong());
                    ui.add_space(4.0);
                }

                let mut selected = controller.draft().workout_type;
                egui::ComboBox::from_label("Type")
                    .selected_text(selected.label())
                    .show_ui(ui, |ui| {
                        for workout_type in WorkoutType::all() {
                            ui.selectable_value(&mut selected, *workout_type, workout_type.label());
                        }
                    });
                if selected != controller.draft().workout_type {
                    controller.toggle_workout_type(selected);
                }

                let secondary = controller.draft().secondary_field();
                let mut enter_pressed = false;
                egui::Grid::new("workout_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        for field in [Field::Distance, Field::Duration, secondary] {
                            ui.label(field.label());
                            let response = ui.add(
                                egui::TextEdit::singleline(controller.draft_mut().text_mut(field))
                                    .hint_text(field.hint())
                                    .desired_width(120.0),
                            );
                            if focus && field == Field::Distance {
                                response.request_focus();
                            }
                            if response.lost_focus()
                                && ui.input(|i| i.key_pressed(egui::Key::Enter))
                            {
                                enter_pressed = true;
                            }
                            ui.end_row();
                        }
                    });

                ui.add_space(4.0);
                if ui.button("✔ OK").clicked() || enter_pressed {
                    action = Some(SidebarAction::Submit);
                }
            });
        });
    });
    ui.add_space(8.0);

    action
}

fn render_workout_list(ui: &mut Ui, rows: &[WorkoutRow]) -> Option<SidebarAction> {
    profiling::scope!("render_workout_list");

    if rows.is_empty() {
        ui.label(
            RichText::new("Click on the map to log your first workout")
                .italics()
                .weak(),
        );
        return None;
    }

    let mut action = None;
    for row in rows {
        if render_workout_row(ui, row) {
            action = Some(SidebarAction::Select(row.id.clone()));
        }
        ui.add_space(6.0);
    }
    action
}

/// One list entry with a coloured left border. Returns `true` when clicked.
fn render_workout_row(ui: &mut Ui, row: &WorkoutRow) -> bool {
    let accent = type_accent(row.workout_type);

    let inner = egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(5.0)
        .inner_margin(egui::Margin {
            left: 12,
            right: 8,
            top: 6,
            bottom: 6,
        })
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&row.title).strong());
            ui.horizontal_wrapped(|ui| {
                for detail in &row.details {
                    ui.label(format!("{} {}", detail.icon, detail.value));
                    ui.label(RichText::new(detail.unit).small().weak());
                    ui.add_space(6.0);
                }
            });
        });

    let rect = inner.response.rect;
    ui.painter().rect_filled(
        egui::Rect::from_min_size(rect.min, egui::vec2(5.0, rect.height())),
        egui::CornerRadius {
            nw: 5,
            sw: 5,
            ne: 0,
            se: 0,
        },
        accent,
    );

    let response = ui
        .interact(rect, egui::Id::new(("workout_row", row.id.as_str())), egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.hovered() {
        ui.painter().rect_filled(rect, 5.0, Color32::from_white_alpha(8));
    }
    response.clicked()
}

fn render_developer_section(ui: &mut Ui, controller: &Controller) -> Option<SidebarAction> {
    let mut action = None;
    egui::CollapsingHeader::new("🔧 Developer")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Storage key:");
                ui.label(RichText::new(&controller.config().storage_key).monospace());
            });
            ui.horizontal(|ui| {
                ui.label("Workouts:");
                ui.label(RichText::new(controller.workouts().len().to_string()).strong());
            });
            ui.add_space(4.0);
            if ui
                .button("🗑 Reset")
                .on_hover_text("Delete every stored workout and start over")
                .clicked()
            {
                action = Some(SidebarAction::Reset);
            }
        });
    action
}

/// Centered message shown instead of the map while it has no position
pub fn map_placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(text).size(18.0).weak());
    });
}

/// Blocking alert. Cleared when dismissed.
pub fn alert_modal(ctx: &egui::Context, alert: &mut Option<String>) {
    let Some(message) = alert.as_deref() else {
        return;
    };

    let mut dismissed = false;
    let response = egui::Modal::new(egui::Id::new("alert_modal")).show(ctx, |ui| {
        ui.set_min_width(240.0);
        ui.label(RichText::new("⚠ Workout Map").strong());
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    });

    if dismissed || response.should_close() {
        *alert = None;
    }
}

/// Help overlay
pub fn help_overlay(ctx: &egui::Context, show_help: &mut bool) {
    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading("Workout Map");
            ui.add_space(8.0);

            ui.label("Keep track of your runs and rides where they happened.");
            ui.add_space(12.0);

            ui.label(RichText::new("Logging a Workout").strong());
            ui.label("• Click on the map where the workout took place");
            ui.label("• Pick running or cycling and fill in the form");
            ui.label("• Press Enter or OK to save it");
            ui.add_space(8.0);

            ui.label(RichText::new("Workouts").strong());
            ui.label("• Click a workout in the list to move the map to it");
            ui.label("• Workouts are saved and restored on the next start");
            ui.add_space(8.0);

            ui.label(RichText::new("Keyboard Shortcuts").strong());
            ui.label("• F1 or Ctrl+H - Toggle this help");
            ui.add_space(12.0);

            if ui.button("Close").clicked() {
                *show_help = false;
            }
        });
}
