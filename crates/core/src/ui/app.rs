//! Main application window.
//!
//! `ExamShotApp` implements [`eframe::App`]. Every frame it drains the
//! analysis dispatcher, advances the capture flow one step, then draws the
//! header, the preview and answer panels, the theme footer, and whichever
//! dialog is open.

use super::answer_panel::AnswerPanel;
use super::overlay::RegionOverlay;
use super::preview_panel::{PreviewAction, PreviewPanel};
use super::settings::{SettingsDialog, SettingsResult};
use super::state::{CaptureFlow, EguiWindow, Notice};
use super::widgets::{ControlStyle, styled_button};
use crate::analysis::{AnalysisClient, AnalysisDispatcher, AnalysisOutcome, AnalysisRequest};
use crate::capture::{CaptureBackend, CapturedImage};
use crate::context::AppContext;
use crate::coordinator::{CaptureKind, ScreenshotCoordinator};
use crate::monitor::KeyProbe;
use crate::render::{self, ResponseRenderer};
use crate::selection::SelectionOutcome;
use crate::theme::Theme;
use eframe::egui;
use std::sync::Arc;
use std::time::Instant;

pub const APP_NAME: &str = "Exam Shot";
const NO_SCREENSHOT: &str = "Please take a screenshot before analyzing";

/// Width share of the preview panel; the answer panel gets the rest.
const PREVIEW_SHARE: f32 = 2.0 / 3.0;

pub struct ExamShotApp<B: CaptureBackend> {
    context: AppContext,
    coordinator: ScreenshotCoordinator<B>,
    probe: Arc<dyn KeyProbe>,
    flow: CaptureFlow,
    preview: PreviewPanel,
    answer: AnswerPanel,
    renderer: ResponseRenderer,
    dispatcher: AnalysisDispatcher,
    settings: Option<SettingsDialog>,
    notice: Option<Notice>,
    footer_theme: Theme,
    applied_theme: Option<Theme>,
}

impl<B: CaptureBackend> ExamShotApp<B> {
    pub fn new(context: AppContext, backend: B, probe: Arc<dyn KeyProbe>) -> Self {
        let coordinator = ScreenshotCoordinator::new(backend, &context.paths.screenshots_dir);
        let footer_theme = context.config.config().theme;
        Self {
            context,
            coordinator,
            probe,
            flow: CaptureFlow::Idle,
            preview: PreviewPanel::default(),
            answer: AnswerPanel::default(),
            renderer: ResponseRenderer::new(),
            dispatcher: AnalysisDispatcher::new(),
            settings: None,
            notice: None,
            footer_theme,
            applied_theme: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let theme = self.context.config.config().theme;
        if self.applied_theme != Some(theme) {
            ctx.set_visuals(theme.visuals());
            self.applied_theme = Some(theme);
            self.footer_theme = theme;
            tracing::info!("Theme changed to {}", theme);
        }
    }

    fn change_theme(&mut self, theme: Theme) {
        if let Err(e) = self.context.config.set_theme(theme.as_str()) {
            tracing::error!("Error changing theme: {}", e);
        }
    }

    // --- capture -----------------------------------------------------------

    fn start_capture(&mut self, ctx: &egui::Context, kind: CaptureKind) {
        if !self.flow.is_idle() {
            return;
        }
        tracing::info!("Taking {:?} screenshot", kind);
        let guard = self.coordinator.begin(EguiWindow::new(ctx, true));
        self.flow = CaptureFlow::Hiding {
            kind,
            guard,
            ready_at: Instant::now() + self.coordinator.settle_delay(),
        };
        ctx.request_repaint();
    }

    fn advance_capture(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let settle = self.coordinator.settle_delay();

        self.flow = match std::mem::replace(&mut self.flow, CaptureFlow::Idle) {
            CaptureFlow::Idle => CaptureFlow::Idle,

            CaptureFlow::Hiding { kind, guard, ready_at } if now < ready_at => {
                ctx.request_repaint_after(ready_at - now);
                CaptureFlow::Hiding { kind, guard, ready_at }
            }
            CaptureFlow::Hiding { kind: CaptureKind::Full, guard, .. } => {
                let captured = self.coordinator.finish_full(guard);
                Self::show_capture(&mut self.preview, &mut self.notice, ctx, captured.map(Some));
                CaptureFlow::Idle
            }
            CaptureFlow::Hiding { kind: CaptureKind::Region, guard, .. } => CaptureFlow::Selecting {
                guard,
                overlay: RegionOverlay::open(ctx, self.probe.clone()),
            },

            CaptureFlow::Selecting { guard, mut overlay } => match overlay.show(ctx) {
                None => CaptureFlow::Selecting { guard, overlay },
                Some(SelectionOutcome::Cancelled) => {
                    let result = self.coordinator.finish_region(guard, SelectionOutcome::Cancelled);
                    Self::show_capture(&mut self.preview, &mut self.notice, ctx, result);
                    CaptureFlow::Idle
                }
                Some(outcome) => {
                    ctx.request_repaint_after(settle);
                    CaptureFlow::Settling {
                        guard,
                        outcome,
                        ready_at: now + settle,
                    }
                }
            },

            CaptureFlow::Settling { guard, outcome, ready_at } if now < ready_at => {
                ctx.request_repaint_after(ready_at - now);
                CaptureFlow::Settling { guard, outcome, ready_at }
            }
            CaptureFlow::Settling { guard, outcome, .. } => {
                let result = self.coordinator.finish_region(guard, outcome);
                Self::show_capture(&mut self.preview, &mut self.notice, ctx, result);
                CaptureFlow::Idle
            }
        };
    }

    fn show_capture(
        preview: &mut PreviewPanel,
        notice: &mut Option<Notice>,
        ctx: &egui::Context,
        result: crate::Result<Option<&CapturedImage>>,
    ) {
        match result {
            Ok(Some(image)) => preview.set_image(ctx, image),
            Ok(None) => tracing::info!("Region selection was cancelled or failed"),
            Err(e) => *notice = Some(Notice::new("Error", format!("Failed to take screenshot: {}", e))),
        }
    }

    fn clear_preview(&mut self) {
        tracing::info!("Clearing preview content");
        self.coordinator.clear();
        self.preview.clear();
    }

    fn save_screenshot(&mut self) {
        match self.coordinator.save_to_disk() {
            Ok(path) => {
                self.notice = Some(Notice::new("Saved", format!("Screenshot saved to {}", path.display())));
            }
            Err(e) => {
                tracing::error!("Error saving screenshot: {}", e);
                self.notice = Some(Notice::new("Error", format!("Failed to save screenshot: {}", e)));
            }
        }
    }

    // --- analysis ----------------------------------------------------------

    fn analyze(&mut self, ctx: &egui::Context) {
        tracing::info!("Triggering screenshot analysis");
        let data = match self.coordinator.encode() {
            Ok(data) => data,
            Err(crate::AppError::NoImage) => {
                self.answer.set_message(NO_SCREENSHOT);
                self.notice = Some(Notice::new("No Screenshot", NO_SCREENSHOT));
                return;
            }
            Err(e) => {
                render::show(&mut self.answer, render::failure(&e.to_string()));
                return;
            }
        };

        let config = self.context.config.config();
        let client = match AnalysisClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                render::show(&mut self.answer, render::failure(&e.to_string()));
                return;
            }
        };
        let request = AnalysisRequest::new(config, data, chrono::Local::now());

        self.answer.set_loading();
        let repaint = ctx.clone();
        let seq = self
            .dispatcher
            .submit(client, request, move || repaint.request_repaint());
        tracing::info!("Analysis request #{} submitted", seq);
    }

    fn poll_analysis(&mut self) {
        match self.dispatcher.drain() {
            Some(AnalysisOutcome::Completed(response)) => {
                self.renderer.render_into(&mut self.answer, &response);
            }
            Some(AnalysisOutcome::Failed(message)) => {
                render::show(&mut self.answer, render::failure(&message));
            }
            None => {}
        }
    }

    // --- layout ------------------------------------------------------------

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.settings = Some(SettingsDialog::new(self.context.config.config()));
                        ui.close();
                    }
                    let has_image = self.coordinator.image().is_some();
                    if ui.add_enabled(has_image, egui::Button::new("Save Screenshot")).clicked() {
                        self.save_screenshot();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    fn header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(6.0);
                ui.label(egui::RichText::new(APP_NAME).size(26.0).strong());
                ui.label(egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION"))).size(13.0));
                ui.add_space(6.0);
            });
        });
    }

    fn footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Select Theme:");
                egui::ComboBox::from_id_salt("footer_theme")
                    .selected_text(self.footer_theme.as_str())
                    .show_ui(ui, |ui| {
                        for theme in Theme::ALL {
                            ui.selectable_value(&mut self.footer_theme, *theme, theme.as_str());
                        }
                    });
                if styled_button(ui, ControlStyle::Primary, "Apply Theme").clicked() {
                    self.change_theme(self.footer_theme);
                }
            });
            ui.add_space(4.0);
        });
    }

    fn content(&mut self, ctx: &egui::Context) {
        let capture_enabled = self.flow.is_idle();
        let mut action = None;

        let width = ctx.viewport_rect().width();
        egui::SidePanel::left("preview_panel")
            .resizable(true)
            .default_width(width * PREVIEW_SHARE)
            .show(ctx, |ui| {
                action = self.preview.show(ui, capture_enabled);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.answer.show(ui);
        });

        match action {
            Some(PreviewAction::FullScreen) => self.start_capture(ctx, CaptureKind::Full),
            Some(PreviewAction::SelectRegion) => self.start_capture(ctx, CaptureKind::Region),
            Some(PreviewAction::Analyze) => self.analyze(ctx),
            Some(PreviewAction::Clear) => self.clear_preview(),
            None => {}
        }
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        if let Some(dialog) = &mut self.settings {
            match dialog.show(ctx) {
                Some(SettingsResult::Saved(config)) => {
                    self.context.config.replace(config);
                    self.settings = None;
                    self.notice = Some(Notice::new("Success", "Settings saved successfully"));
                }
                Some(SettingsResult::Cancelled) => self.settings = None,
                None => {}
            }
        }

        if let Some(notice) = &self.notice {
            let mut close = false;
            egui::Window::new(notice.title.as_str())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.set_max_width(260.0);
                    ui.label(notice.message.as_str());
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        close = styled_button(ui, ControlStyle::Primary, "OK").clicked();
                    });
                });
            if close {
                self.notice = None;
            }
        }
    }
}

impl<B: CaptureBackend> eframe::App for ExamShotApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        self.poll_analysis();
        self.advance_capture(ctx);

        self.menu_bar(ctx);
        self.header(ctx);
        self.footer(ctx);
        self.content(ctx);
        self.dialogs(ctx);
    }
}
