//! Answer panel: shows rendered analysis results.

use super::widgets::{ControlStyle, styled_button};
use crate::render::{AnswerSurface, ConfidenceBucket, SegmentStyle, StyledSegment, plain_text};
use eframe::egui;
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId};

pub const LOADING_LABEL: &str = "Processing API request...";
pub const LOADING_TEXT: &str = "Analyzing screenshot... please wait";

fn hex(rgb: u32) -> Color32 {
    Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Font, colours and weight for one segment style.
fn text_format(style: SegmentStyle) -> TextFormat {
    let (size, strong, color, background) = match style {
        SegmentStyle::Plain => (14.0, false, hex(0x000000), Color32::TRANSPARENT),
        SegmentStyle::Title => (16.0, true, hex(0xFFFFFF), hex(0x0066CC)),
        SegmentStyle::QuestionNumber => (15.0, true, hex(0xFFFFFF), hex(0x333333)),
        SegmentStyle::QuestionText => (13.0, false, hex(0x000000), hex(0xF5F5F5)),
        SegmentStyle::SectionHeader => (13.0, true, hex(0xFFFFFF), hex(0x666666)),
        SegmentStyle::CorrectAnswer => (13.0, true, hex(0x006400), hex(0xCCFFCC)),
        SegmentStyle::IncorrectAnswer => (13.0, false, hex(0x000000), hex(0xF8F8F8)),
        SegmentStyle::Explanation => (13.0, false, hex(0x000000), hex(0xFFF8DC)),
        SegmentStyle::Confidence => (13.0, true, hex(0xFFFFFF), hex(0x0066CC)),
        SegmentStyle::Meter(bucket) => {
            let color = match bucket {
                ConfidenceBucket::High => hex(0x006400),
                ConfidenceBucket::Medium => hex(0xFF8C00),
                ConfidenceBucket::Low => hex(0xB22222),
            };
            (13.0, true, color, Color32::TRANSPARENT)
        }
        SegmentStyle::Error => (13.0, true, hex(0xFFFFFF), hex(0xFF5722)),
    };

    // egui has no bold face by default; strong text is drawn slightly larger.
    let size = if strong { size + 1.0 } else { size };
    TextFormat {
        font_id: FontId::proportional(size),
        color,
        background,
        ..Default::default()
    }
}

/// Builds one layout job from the segments.
pub fn layout_job(segments: &[StyledSegment], wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    for segment in segments {
        job.append(&segment.text, 0.0, text_format(segment.style));
    }
    job
}

/// What the answer area currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AnswerContent {
    Segments(Vec<StyledSegment>),
    Loading,
}

/// Display surface for rendered answers.
pub struct AnswerPanel {
    content: AnswerContent,
    finished: bool,
    scroll_to_top: bool,
}

impl Default for AnswerPanel {
    fn default() -> Self {
        Self {
            content: AnswerContent::Segments(Vec::new()),
            finished: true,
            scroll_to_top: false,
        }
    }
}

impl AnswerSurface for AnswerPanel {
    fn clear(&mut self) {
        self.content = AnswerContent::Segments(Vec::new());
        self.finished = false;
    }

    fn append(&mut self, segment: StyledSegment) {
        match &mut self.content {
            AnswerContent::Segments(segments) => segments.push(segment),
            AnswerContent::Loading => self.content = AnswerContent::Segments(vec![segment]),
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.scroll_to_top = true;
    }
}

impl AnswerPanel {
    /// Replaces the content with a single plain message.
    pub fn set_message(&mut self, message: &str) {
        self.clear();
        self.append(StyledSegment::new(message, SegmentStyle::Plain));
        self.finish();
    }

    pub fn set_loading(&mut self) {
        self.content = AnswerContent::Loading;
        self.finished = true;
        self.scroll_to_top = true;
    }

    pub fn is_loading(&self) -> bool {
        self.content == AnswerContent::Loading
    }

    pub fn text(&self) -> String {
        match &self.content {
            AnswerContent::Segments(segments) => plain_text(segments),
            AnswerContent::Loading => LOADING_TEXT.to_string(),
        }
    }

    fn copy_to_clipboard(&self) {
        let text = self.text();
        if text.trim().is_empty() {
            return;
        }
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(()) => tracing::info!("Answer copied to clipboard"),
                Err(e) => tracing::warn!("Failed to copy answer: {}", e),
            },
            Err(e) => tracing::warn!("Clipboard unavailable: {}", e),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Answer");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if styled_button(ui, ControlStyle::Info, "Copy").clicked() {
                    self.copy_to_clipboard();
                }
                if styled_button(ui, ControlStyle::Secondary, "Clear").clicked() {
                    self.clear();
                    self.finish();
                }
            });
        });

        if self.is_loading() {
            ui.add(egui::ProgressBar::new(0.0).animate(true).desired_height(6.0));
            ui.label(LOADING_LABEL);
        }
        ui.separator();

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("answer_scroll")
            .auto_shrink([false, false]);
        if std::mem::take(&mut self.scroll_to_top) {
            scroll = scroll.vertical_scroll_offset(0.0);
        }

        egui::Frame::NONE
            .fill(Color32::WHITE)
            .inner_margin(6.0)
            .show(ui, |ui| {
                scroll.show(ui, |ui| {
                    let width = ui.available_width();
                    match &self.content {
                        AnswerContent::Loading => {
                            ui.label(egui::RichText::new(LOADING_TEXT).color(Color32::BLACK));
                        }
                        AnswerContent::Segments(segments) => {
                            let job = layout_job(segments, width);
                            ui.add(egui::Label::new(job).selectable(true));
                        }
                    }
                });
            });
    }
}
