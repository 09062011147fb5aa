use std::sync::mpsc;
use std::time::Instant;

use anyhow::Context as _;
use eframe::egui;
use tracing::{info, warn};

use crate::auth::{ClickTarget, Panel};
use crate::backend::{AuthForm, Credentials, HttpBackend};
use crate::config::Settings;
use crate::content::{DECORATIONS, HERO_SLIDES, decoration_speeds};
use crate::messages::{WorkerCommand, WorkerResult};
use crate::page::Page;
use crate::slider::Direction;
use crate::surface::{Class, Region};
use crate::theme::Theme;
use crate::view::PageView;
use crate::worker;

const PRELOADER_FADE: f32 = 0.6;
const CUE_PULSE: f32 = 0.8;
const HERO_HEIGHT: f32 = 440.0;
const HEADER_HEIGHT: f32 = 56.0;

#[derive(Default)]
struct FormFields {
    username: String,
    password: String,
}

impl FormFields {
    /// Take the credentials as typed, keeping the username for a retry.
    fn take(&mut self) -> Credentials {
        Credentials::new(self.username.clone(), std::mem::take(&mut self.password))
    }
}

pub struct MriScopeApp {
    page: Page,
    view: PageView,
    theme: Theme,
    cmd_tx: mpsc::Sender<WorkerCommand>,
    result_rx: mpsc::Receiver<WorkerResult>,
    preview_texture: Option<(u64, egui::TextureHandle)>,
    login: FormFields,
    signup: FormFields,
    loaded_at: Option<Instant>,
    last_hover_pos: Option<egui::Pos2>,
    scroll_to_top: bool,
    scroll_to_upload: bool,
}

impl MriScopeApp {
    fn new(
        ctx: &egui::Context,
        page: Page,
        theme: Theme,
        backend: HttpBackend,
    ) -> std::io::Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let wake_ctx = ctx.clone();
        let cmd_tx = worker::spawn_worker(backend, result_tx, move || wake_ctx.request_repaint())?;
        apply_visuals(ctx, &theme);

        Ok(Self {
            page,
            view: PageView::default(),
            theme,
            cmd_tx,
            result_rx,
            preview_texture: None,
            login: FormFields::default(),
            signup: FormFields::default(),
            loaded_at: None,
            last_hover_pos: None,
            scroll_to_top: false,
            scroll_to_upload: false,
        })
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, now: Instant) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.page.apply(result, now, &mut self.view);
        }
    }

    fn send_command(&self, cmd: WorkerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("request worker is gone");
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        apply_visuals(ctx, &self.theme);
        info!(theme = %self.theme.name, "theme changed");
    }

    fn open_auth(&mut self) {
        if self.page.nav.is_open() {
            self.page.nav.toggle(&mut self.view);
        }
        self.page.auth.open_overlay(&mut self.view);
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        {
            let cmd = self.page.pick_file(path);
            self.send_command(cmd);
        }
    }

    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        let generation = self.view.image_generation;
        if let Some((cached, texture)) = &self.preview_texture {
            if *cached == generation {
                return Some(texture.clone());
            }
        }
        let preview = self.view.image(Region::UploadLabel)?;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [preview.width as usize, preview.height as usize],
            &preview.rgba,
        );
        let texture = ctx.load_texture("upload-preview", image, egui::TextureOptions::LINEAR);
        self.preview_texture = Some((generation, texture.clone()));
        Some(texture)
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (escape, theme, left, right) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if escape {
            if self.page.auth.is_open() {
                self.page.auth.close(&mut self.view);
            } else if self.page.nav.is_open() {
                self.page.nav.toggle(&mut self.view);
            }
        }
        if theme {
            self.toggle_theme(ctx);
        }
        if left {
            self.page.click_slider(Direction::Backward, &mut self.view);
        }
        if right {
            self.page.click_slider(Direction::Forward, &mut self.view);
        }
    }

    fn draw_header(&mut self, ctx: &egui::Context) {
        let active = self.view.has(Region::Header, Class::Active);
        // A stale hide flag is ignored once the page is back near the top.
        if active && self.view.has(Region::Header, Class::Hide) {
            return;
        }
        let fill = if active {
            self.theme.surface
        } else {
            self.theme.background
        };
        egui::TopBottomPanel::top("header")
            .exact_height(HEADER_HEIGHT)
            .frame(egui::Frame::new().fill(fill).inner_margin(egui::Margin::symmetric(20, 10)))
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if ui.button("\u{2630}").on_hover_text("Menu").clicked() {
                        self.page.nav.toggle(&mut self.view);
                    }
                    ui.label(
                        egui::RichText::new("MRIScope")
                            .strong()
                            .size(22.0)
                            .color(self.theme.accent),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Book a consultation").clicked() {
                            self.open_auth();
                        }
                        let label = if self.theme.is_dark() { "Light" } else { "Dark" };
                        if ui.small_button(label).clicked() {
                            self.toggle_theme(ui.ctx());
                        }
                    });
                });
            });
    }

    fn draw_nav(&mut self, ctx: &egui::Context) {
        if !self.view.has(Region::Navbar, Class::Active) {
            return;
        }
        if self.view.has(Region::NavOverlay, Class::Active)
            && backdrop(ctx, "nav-overlay", Theme::with_opacity(egui::Color32::BLACK, 0.35))
        {
            self.page.nav.toggle(&mut self.view);
            return;
        }
        let height = ctx.content_rect().height();
        egui::Area::new(egui::Id::new("nav-drawer"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::LEFT_TOP, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(self.theme.surface)
                    .inner_margin(24.0)
                    .show(ui, |ui| {
                        ui.set_min_size(egui::vec2(240.0, height - 48.0));
                        ui.spacing_mut().item_spacing.y = 14.0;
                        let mut close = false;
                        if ui.link("Home").clicked() {
                            self.scroll_to_top = true;
                            close = true;
                        }
                        if ui.link("Classify a scan").clicked() {
                            self.scroll_to_upload = true;
                            close = true;
                        }
                        if ui.link("Book a consultation").clicked() {
                            self.open_auth();
                        }
                        if close {
                            self.page.nav.toggle(&mut self.view);
                        }
                    });
            });
    }

    fn draw_page(&mut self, ctx: &egui::Context, now: Instant) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.background).inner_margin(0.0))
            .show(ctx, |ui| {
                self.track_pointer(ui, ctx);

                let mut area = egui::ScrollArea::vertical().id_salt("page");
                if std::mem::take(&mut self.scroll_to_top) {
                    area = area.vertical_scroll_offset(0.0);
                }
                let output = area.show(ui, |ui| {
                    self.draw_hero(ui, now);
                    ui.add_space(32.0);
                    self.draw_upload(ui, ctx);
                    ui.add_space(48.0);
                });
                let offset = output.state.offset.y;
                if offset != self.page.scroll.last_offset() {
                    self.page.scroll.on_scroll(offset, &mut self.view);
                }
            });
    }

    fn track_pointer(&mut self, ui: &egui::Ui, ctx: &egui::Context) {
        let hover_pos = ctx.input(|i| i.pointer.hover_pos());
        if hover_pos == self.last_hover_pos {
            return;
        }
        self.last_hover_pos = hover_pos;
        if let Some(pos) = hover_pos {
            let viewport = ui.max_rect();
            let local = pos - viewport.min;
            self.page.parallax.on_pointer_move(
                [local.x, local.y],
                [viewport.width(), viewport.height()],
                &mut self.view,
            );
        }
    }

    fn draw_hero(&mut self, ui: &mut egui::Ui, now: Instant) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, HERO_HEIGHT), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.theme.surface);

        for (i, decoration) in DECORATIONS.iter().enumerate() {
            let offset = self.view.offset(Region::Decoration(i));
            let center = rect.min
                + egui::vec2(
                    decoration.anchor[0] * rect.width(),
                    decoration.anchor[1] * rect.height(),
                )
                + egui::vec2(offset.x, offset.y);
            painter.circle_filled(
                center,
                decoration.radius,
                Theme::with_opacity(self.theme.decoration, 0.55),
            );
        }

        let active = (0..HERO_SLIDES.len())
            .find(|&i| self.view.has(Region::Slide(i), Class::Active))
            .unwrap_or(0);
        let slide = &HERO_SLIDES[active];
        let text_width = (rect.width() - 240.0).clamp(240.0, 760.0);
        let mut cursor = egui::pos2(rect.center().x - text_width / 2.0, rect.top() + 110.0);
        for (text, size, color) in [
            (slide.kicker, self.theme.body_size, self.theme.accent),
            (slide.heading, self.theme.heading_size, self.theme.heading_color),
            (slide.body, self.theme.body_size + 2.0, self.theme.foreground),
        ] {
            let galley = painter.layout(
                text.to_string(),
                egui::FontId::proportional(size),
                color,
                text_width,
            );
            let height = galley.rect.height();
            painter.galley(cursor, galley, color);
            cursor.y += height + 16.0;
        }

        let button_size = egui::vec2(44.0, 44.0);
        let prev = ui.put(
            egui::Rect::from_center_size(
                egui::pos2(rect.left() + 48.0, rect.center().y),
                button_size,
            ),
            egui::Button::new(egui::RichText::new("\u{2039}").size(28.0)),
        );
        let next = ui.put(
            egui::Rect::from_center_size(
                egui::pos2(rect.right() - 48.0, rect.center().y),
                button_size,
            ),
            egui::Button::new(egui::RichText::new("\u{203A}").size(28.0)),
        );
        self.page
            .hover_slider_controls(prev.hovered() || next.hovered(), now);
        if prev.clicked() {
            self.page.click_slider(Direction::Backward, &mut self.view);
        }
        if next.clicked() {
            self.page.click_slider(Direction::Forward, &mut self.view);
        }

        let dot_y = rect.bottom() - 28.0;
        let dots_width = HERO_SLIDES.len() as f32 * 18.0;
        for i in 0..HERO_SLIDES.len() {
            let x = rect.center().x - dots_width / 2.0 + i as f32 * 18.0 + 9.0;
            let color = if i == active {
                self.theme.accent
            } else {
                self.theme.muted
            };
            painter.circle_filled(egui::pos2(x, dot_y), 4.0, color);
        }
        if !self.page.slider.is_running() {
            painter.text(
                egui::pos2(rect.right() - 24.0, rect.top() + 20.0),
                egui::Align2::RIGHT_TOP,
                "paused",
                egui::FontId::proportional(13.0),
                self.theme.muted,
            );
        }
    }

    fn draw_upload(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            let cmd = self.page.pick_file(path);
            self.send_command(cmd);
        }

        let texture = self.preview_texture(ctx);
        ui.vertical_centered(|ui| {
            let heading = ui.label(
                egui::RichText::new("Classify a scan")
                    .size(30.0)
                    .color(self.theme.heading_color),
            );
            if std::mem::take(&mut self.scroll_to_upload) {
                heading.scroll_to_me(Some(egui::Align::TOP));
            }
            ui.add_space(12.0);

            egui::Frame::new()
                .fill(self.theme.surface)
                .corner_radius(8.0)
                .inner_margin(20.0)
                .show(ui, |ui| {
                    ui.set_width(360.0);
                    ui.vertical_centered(|ui| {
                        match (&texture, self.view.text(Region::UploadLabel)) {
                            (Some(texture), _) => {
                                ui.add(egui::Image::new(texture).max_size(egui::vec2(320.0, 240.0)));
                            }
                            (None, Some(name)) => {
                                ui.label(name);
                            }
                            (None, None) => {
                                ui.label(
                                    egui::RichText::new("Drop an MRI image here or choose a file")
                                        .color(self.theme.muted),
                                );
                            }
                        }
                        if let Some(file) = self.page.upload.selected() {
                            ui.label(
                                egui::RichText::new(format!("{} ({} KB)", file.name, file.bytes.len() / 1024))
                                    .small()
                                    .color(self.theme.muted),
                            );
                        }
                        ui.add_space(8.0);
                        if ui.button("Choose file\u{2026}").clicked() {
                            self.pick_file();
                        }
                    });
                });

            ui.add_space(12.0);
            if ui
                .add(egui::Button::new(egui::RichText::new("Upload").strong()).min_size(egui::vec2(140.0, 36.0)))
                .clicked()
            {
                if let Some(cmd) = self.page.submit_upload(&mut self.view) {
                    self.send_command(cmd);
                }
            }

            ui.add_space(16.0);
            self.draw_result(ui);
            self.draw_info(ui);
        });
    }

    fn draw_result(&mut self, ui: &mut egui::Ui) {
        if !self.view.display(Region::ResultPanel).is_visible() {
            return;
        }
        if let Some(label) = self.view.link(Region::ResultText).map(str::to_owned) {
            ui.horizontal(|ui| {
                ui.label("Result:");
                let link = ui
                    .link(egui::RichText::new(&label).strong().size(20.0))
                    .on_hover_text("Learn more about this result");
                if link.clicked() {
                    let cmd = self.page.request_info(&label);
                    self.send_command(cmd);
                }
                if self.page.info.pending().is_some() {
                    ui.spinner();
                }
            });
        } else if let Some(message) = self.view.text(Region::ResultText) {
            ui.label(egui::RichText::new(message).color(self.theme.error));
        }
    }

    fn draw_info(&mut self, ui: &mut egui::Ui) {
        if !self.view.display(Region::InfoPanel).is_visible() {
            return;
        }
        let Some(text) = self.view.text(Region::InfoText) else {
            return;
        };
        let pulse = self.view.cue.map_or(0.0, |cue| {
            let elapsed = cue.at.elapsed().as_secs_f32();
            if elapsed < CUE_PULSE {
                cue.volume * (1.0 - elapsed / CUE_PULSE)
            } else {
                0.0
            }
        });
        let stroke_color = Theme::with_opacity(self.theme.accent, (pulse * 3.0).min(1.0));
        ui.add_space(12.0);
        egui::Frame::new()
            .fill(self.theme.surface)
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_max_width(560.0);
                ui.label(egui::RichText::new(text).color(self.theme.foreground));
            });
        if pulse > 0.0 {
            ui.ctx().request_repaint();
        }
    }

    fn draw_back_to_top(&mut self, ctx: &egui::Context) {
        if !self.view.has(Region::BackToTop, Class::Active) {
            return;
        }
        egui::Area::new(egui::Id::new("back-to-top"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::RIGHT_BOTTOM, [-24.0, -24.0])
            .show(ctx, |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new("\u{2191}").size(20.0)))
                    .on_hover_text("Back to top")
                    .clicked()
                {
                    self.scroll_to_top = true;
                }
            });
    }

    fn draw_auth(&mut self, ctx: &egui::Context) {
        if !self.view.display(Region::AuthOverlay).is_visible() {
            return;
        }
        let dim = if self.view.has(Region::Page, Class::Blur) { 0.55 } else { 0.3 };
        if backdrop(ctx, "auth-overlay", Theme::with_opacity(egui::Color32::BLACK, dim)) {
            self.page.click_auth_overlay(ClickTarget::Background, &mut self.view);
            return;
        }
        let Some(panel) = self.page.auth.panel() else {
            return;
        };
        let (title, form) = match panel {
            Panel::Login => ("Log in", AuthForm::Login),
            Panel::Signup => ("Sign up", AuthForm::Signup),
        };
        let window = egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let fields = match panel {
                    Panel::Login => &mut self.login,
                    Panel::Signup => &mut self.signup,
                };
                egui::Grid::new("auth-fields").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
                    ui.label("Username");
                    ui.text_edit_singleline(&mut fields.username);
                    ui.end_row();
                    ui.label("Password");
                    ui.add(egui::TextEdit::singleline(&mut fields.password).password(true));
                    ui.end_row();
                });
                ui.add_space(8.0);
                let submitted = ui.button(title).clicked()
                    || ui.input(|i| i.key_pressed(egui::Key::Enter));
                if submitted {
                    let credentials = fields.take();
                    if let Some(cmd) = self.page.submit_auth(form, credentials, &mut self.view) {
                        self.send_command(cmd);
                    }
                }
                ui.separator();
                let (prompt, show_login) = match panel {
                    Panel::Login => ("No account yet? Sign up", false),
                    Panel::Signup => ("Already registered? Log in", true),
                };
                if ui.link(prompt).clicked() {
                    self.page.auth.toggle_forms(show_login, &mut self.view);
                }
            });
        if window.is_some_and(|w| w.response.clicked()) {
            self.page.click_auth_overlay(ClickTarget::Form, &mut self.view);
        }
    }

    fn draw_welcome(&self, ctx: &egui::Context) {
        if !self.view.display(Region::WelcomeBanner).is_visible() {
            return;
        }
        let Some(text) = self.view.text(Region::WelcomeBanner) else {
            return;
        };
        egui::Area::new(egui::Id::new("welcome-banner"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_TOP, [0.0, HEADER_HEIGHT + 12.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(self.theme.accent)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(20, 12))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(text).size(18.0).color(egui::Color32::WHITE));
                    });
            });
    }

    fn draw_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.view.pending_alert().map(str::to_owned) else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(&message);
                    ui.add_space(8.0);
                    dismissed = ui.button("OK").clicked();
                });
            });
        if dismissed {
            self.view.dismiss_alert();
        }
    }

    fn draw_preloader(&self, ctx: &egui::Context) {
        let Some(loaded_at) = self.loaded_at else {
            return;
        };
        let elapsed = loaded_at.elapsed().as_secs_f32();
        if elapsed >= PRELOADER_FADE {
            return;
        }
        let opacity = 1.0 - elapsed / PRELOADER_FADE;
        let rect = ctx.content_rect();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("preloader"),
        ));
        painter.rect_filled(rect, 0.0, Theme::with_opacity(self.theme.background, opacity));
        painter.circle_stroke(
            rect.center(),
            24.0,
            egui::Stroke::new(3.0, Theme::with_opacity(self.theme.accent, opacity)),
        );
        ctx.request_repaint();
    }
}

impl eframe::App for MriScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_results(now);

        if !self.page.is_loaded() {
            self.page.on_load(now, &mut self.view);
            self.loaded_at = Some(now);
        }
        self.page.tick(now, &mut self.view);
        self.handle_keys(ctx);

        self.draw_header(ctx);
        self.draw_page(ctx, now);
        self.draw_nav(ctx);
        self.draw_back_to_top(ctx);
        self.draw_auth(ctx);
        self.draw_welcome(ctx);
        self.draw_alert(ctx);
        self.draw_preloader(ctx);

        if let Some(deadline) = self.page.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

fn apply_visuals(ctx: &egui::Context, theme: &Theme) {
    ctx.set_visuals(if theme.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
}

/// Full-window dimming layer below the foreground. Returns whether it was clicked.
fn backdrop(ctx: &egui::Context, id: &str, color: egui::Color32) -> bool {
    let rect = ctx.content_rect();
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Middle)
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            let response = ui.allocate_rect(rect, egui::Sense::click());
            ui.painter().rect_filled(rect, 0.0, color);
            response.clicked()
        })
        .inner
}

pub fn run(settings: Settings, windowed: bool) -> anyhow::Result<()> {
    let page = Page::new(&settings, HERO_SLIDES.len(), decoration_speeds())
        .context("Failed to build the page")?;
    let backend = HttpBackend::new(&settings.base_url, settings.timeout);
    let theme = Theme::from_name(&settings.theme);
    info!(server = %settings.base_url, parallax = settings.parallax.name(), "starting page");

    let title = "MRIScope";
    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title(title)
    } else {
        egui::ViewportBuilder::default()
            .with_maximized(true)
            .with_title(title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |cc| {
            let app = MriScopeApp::new(&cc.egui_ctx, page, theme, backend)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
