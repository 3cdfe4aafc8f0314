//! Blocking notices: one modal at a time, acknowledged with OK.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeSeverity::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeSeverity::Error, message.into());
    }

    fn push(&mut self, severity: NoticeSeverity, message: String) {
        tracing::debug!(?severity, %message, "ui: notice queued");
        self.pending.push_back(Notice { severity, message });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) {
        self.pending.pop_front();
    }

    /// True while a notice is waiting for acknowledgement.
    pub fn is_active(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.current().cloned() else {
            return;
        };
        let title = match notice.severity {
            NoticeSeverity::Info => "Notice",
            NoticeSeverity::Error => "Error",
        };

        let mut acknowledged = false;
        egui::Window::new(title)
            .id(egui::Id::new("notice_modal"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let text = egui::RichText::new(&notice.message);
                let text = match notice.severity {
                    NoticeSeverity::Info => text,
                    NoticeSeverity::Error => text.color(ui.visuals().error_fg_color),
                };
                ui.label(text);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            });

        if acknowledged {
            self.dismiss();
        }
    }
}
