use std::time::Duration;

use eframe::egui;

use crate::app::controller::FilterController;
use crate::app::events::AppEvent;
use crate::app::state::Phase;
use crate::engine::color_matrix::SATURATION_BOOST;
use crate::engine::fit::fit_contain;
use crate::infra::config::AppConfig;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf4, 0xf8);
const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x33, 0x33, 0x33);
const PLACEHOLDER_COLOR: egui::Color32 = egui::Color32::from_rgb(0x88, 0x88, 0x88);
const BUTTON_GREEN: egui::Color32 = egui::Color32::from_rgb(0x4c, 0xaf, 0x50);
const BUTTON_ORANGE: egui::Color32 = egui::Color32::from_rgb(0xff, 0x57, 0x22);

const RING_RADIUS: f32 = 30.0;
const RING_STROKE: f32 = 5.0;
const BUTTON_SIZE: egui::Vec2 = egui::vec2(160.0, 44.0);
const BUTTON_GAP: f32 = 10.0;

pub struct AppShell {
    controller: FilterController,
    canvas_size: f32,
    texture: Option<egui::TextureHandle>,
    // (bitmap sequence, filter flag) currently uploaded; the texture is
    // only rebuilt when this changes.
    uploaded_key: Option<(u64, bool)>,
}

impl AppShell {
    fn new(canvas_size: f32, controller: FilterController) -> Self {
        Self {
            controller,
            canvas_size,
            texture: None,
            uploaded_key: None,
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let filter_on = self.controller.state().filter_engaged();
        let Some(bitmap) = self.controller.bitmap() else {
            self.texture = None;
            self.uploaded_key = None;
            return;
        };

        let key = (bitmap.sequence, filter_on);
        if self.uploaded_key == Some(key) {
            return;
        }

        let mut pixels = bitmap.pixels.clone();
        if filter_on {
            SATURATION_BOOST.apply_rgba(&mut pixels);
        }
        let size = [bitmap.width as usize, bitmap.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
        self.texture = Some(ctx.load_texture(
            "selected-image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));
        self.uploaded_key = Some(key);
    }

    fn draw_rings(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(250.0, 130.0), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let at = |x: f32, y: f32| rect.min + egui::vec2(x, y);

        let rings = [
            (at(50.0, 50.0), egui::Color32::from_rgb(0x00, 0x00, 0xff)),
            (at(120.0, 50.0), egui::Color32::BLACK),
            (at(190.0, 50.0), egui::Color32::from_rgb(0xff, 0x00, 0x00)),
            (at(85.0, 90.0), egui::Color32::from_rgb(0xff, 0xff, 0x00)),
            (at(155.0, 90.0), egui::Color32::from_rgb(0x00, 0x80, 0x00)),
        ];
        for (center, color) in rings {
            painter.circle_stroke(center, RING_RADIUS, egui::Stroke::new(RING_STROKE, color));
        }
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        if self.controller.state().phase() == Phase::Empty || self.controller.bitmap().is_none() {
            // Also shown while a decode is still pending or has failed.
            ui.label(
                egui::RichText::new("Nenhuma imagem selecionada")
                    .size(16.0)
                    .color(PLACEHOLDER_COLOR),
            );
            return;
        }

        self.sync_texture(ui.ctx());

        let side = self.canvas_size;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::CornerRadius::same(10), egui::Color32::WHITE);

        if let (Some(texture), Some(bitmap)) = (self.texture.as_ref(), self.controller.bitmap()) {
            let fitted = fit_contain(bitmap.width, bitmap.height, side, side);
            if !fitted.is_empty() {
                let dest = egui::Rect::from_min_size(
                    rect.min + egui::vec2(fitted.x, fitted.y),
                    egui::vec2(fitted.width, fitted.height),
                );
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), dest, uv, egui::Color32::WHITE);
            }
        }
    }

    fn draw_buttons(&mut self, ui: &mut egui::Ui) {
        let show_apply = self.controller.state().phase() != Phase::Empty;
        let total_width = if show_apply {
            BUTTON_SIZE.x * 2.0 + BUTTON_GAP
        } else {
            BUTTON_SIZE.x
        };

        ui.horizontal(|ui| {
            let lead = (ui.available_width() - total_width).max(0.0) / 2.0;
            ui.add_space(lead);

            if ui
                .add(styled_button("Selecionar Imagem", BUTTON_GREEN))
                .clicked()
            {
                self.controller.dispatch(AppEvent::RequestPick);
            }

            if show_apply {
                ui.add_space(BUTTON_GAP);
                if ui
                    .add(styled_button("Aplicar Filtro", BUTTON_ORANGE))
                    .clicked()
                {
                    self.controller.dispatch(AppEvent::ApplyFilter);
                }
            }
        });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice() else {
            return;
        };
        let (title, body) = (notice.title, notice.body);

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(body);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.controller.dismiss_notice();
        }
    }
}

fn styled_button(label: &str, fill: egui::Color32) -> egui::Button<'_> {
    egui::Button::new(
        egui::RichText::new(label)
            .size(16.0)
            .strong()
            .color(egui::Color32::WHITE),
    )
    .fill(fill)
    .corner_radius(egui::CornerRadius::same(8))
    .min_size(BUTTON_SIZE)
}

impl eframe::App for AppShell {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump();
        if self.controller.is_busy() {
            // Dialog and decode results arrive on channels; keep polling.
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(BACKGROUND))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    self.draw_rings(ui);
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Editor de Imagens")
                            .size(24.0)
                            .strong()
                            .color(TITLE_COLOR),
                    );
                    ui.add_space(20.0);
                    self.draw_canvas(ui);
                    ui.add_space(20.0);
                    self.draw_buttons(ui);
                });
            });

        self.show_notice(ctx);
    }
}

pub fn launch(config: AppConfig, controller: FilterController) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Editor de Imagens",
        options,
        Box::new(move |_cc| Ok(Box::new(AppShell::new(config.canvas_size, controller)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}
