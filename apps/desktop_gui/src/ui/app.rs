use client_core::{ClientError, ClientSettings, ListState};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::{DraftError, User};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::create_form::{CreateUserForm, FormAction};
use crate::ui::notifications::NoticeQueue;
use crate::ui::user_row::{self, RowAction, COLUMN_HEADERS};

pub const LOADING_TEXT: &str = "Loading users…";
pub const EMPTY_TEXT: &str = "No users found.";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_url: String,
}

impl From<&ClientSettings> for StartupConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            api_url: settings.api_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// What the main panel shows for a given list state.
#[derive(Debug, PartialEq, Eq)]
enum ListBody<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Rows(&'a [User]),
}

fn list_body(list: &ListState) -> ListBody<'_> {
    if list.loading {
        ListBody::Loading
    } else if let Some(error) = list.error.as_deref() {
        ListBody::Error(error)
    } else if list.users.is_empty() {
        ListBody::Empty
    } else {
        ListBody::Rows(&list.users)
    }
}

pub struct UsersApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_url: String,
    search_term: String,
    list: ListState,
    form: CreateUserForm,
    notices: NoticeQueue,
    pending_delete: Option<User>,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl UsersApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            api_url: startup.api_url,
            search_term: String::new(),
            list: ListState {
                loading: true,
                ..ListState::default()
            },
            form: CreateUserForm::default(),
            notices: NoticeQueue::default(),
            pending_delete: None,
            status: "Connecting to backend...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ListUpdated(list) => {
                    self.list = list;
                }
                UiEvent::UserCreated { name } => {
                    self.form.finish_success();
                    self.status = format!("Created {name}");
                    self.notices.info("User created");
                }
                UiEvent::CreateFailed(err) => {
                    self.form.finish_failure();
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.notices
                        .error(format!("Could not create user: {}", err.message()));
                }
                UiEvent::UserDeleted { id } => {
                    self.status = format!("Deleted user {id}");
                    self.notices.info("User deleted");
                }
                UiEvent::DeleteFailed { id, error } => {
                    self.status = format!(
                        "{} error: {}",
                        err_label(error.category()),
                        error.message()
                    );
                    self.notices
                        .error(format!("Could not delete user {id}: {}", error.message()));
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    if err.context() == UiErrorContext::BackendStartup {
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Error,
                            message: self.status.clone(),
                        });
                    }
                }
            }
        }
    }

    fn on_search_edited(&mut self) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SearchChanged {
                query: self.search_term.clone(),
            },
            &mut self.status,
        );
    }

    fn on_form_action(&mut self, action: FormAction) {
        match action {
            FormAction::Submit(draft) => {
                let queued = dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CreateUser { draft },
                    &mut self.status,
                );
                if !queued {
                    self.form.finish_failure();
                    self.notices
                        .error(format!("Could not create user: {}", self.status));
                }
            }
            FormAction::Rejected(err) => self.reject_draft(err),
        }
    }

    fn reject_draft(&mut self, err: DraftError) {
        let err = UiError::from_client_error(
            UiErrorContext::CreateUser,
            &ClientError::Validation(err),
        );
        self.notices.error(err.message());
    }

    fn on_row_action(&mut self, action: RowAction) {
        match action {
            RowAction::Edit(id) => self.notices.info(format!("Edit user {id}")),
            RowAction::Delete(user) => self.pending_delete = Some(user),
        }
    }

    fn confirm_delete(&mut self) {
        if let Some(user) = self.pending_delete.take() {
            let queued = dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::DeleteUser { id: user.id },
                &mut self.status,
            );
            if !queued {
                self.notices
                    .error(format!("Could not delete user {}: {}", user.id, self.status));
            }
        }
    }

    fn modal_open(&self) -> bool {
        self.notices.is_active() || self.pending_delete.is_some()
    }

    fn show_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Users");
        ui.small(self.api_url.as_str());
        ui.add_space(4.0);
        ui.label(format!("Total users: {}", self.list.users.len()));
        ui.separator();

        if let Some(action) = self.form.show(ui) {
            self.on_form_action(action);
        }

        ui.separator();
        ui.label("Search");
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.search_term)
                .hint_text("Name or email")
                .id_salt("user_search"),
        );
        if search.changed() {
            self.on_search_edited();
        }
        if ui.button("Refresh").clicked() {
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Refresh, &mut self.status);
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_user_list(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        match list_body(&self.list) {
            ListBody::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOADING_TEXT);
                });
            }
            ListBody::Error(error) => {
                let color = ui.visuals().error_fg_color;
                ui.colored_label(color, format!("Error: {error}"));
            }
            ListBody::Empty => {
                ui.label(EMPTY_TEXT);
            }
            ListBody::Rows(users) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::Grid::new("users_table")
                            .num_columns(COLUMN_HEADERS.len())
                            .striped(true)
                            .spacing([16.0, 6.0])
                            .show(ui, |ui| {
                                for header in COLUMN_HEADERS {
                                    ui.strong(header);
                                }
                                ui.end_row();
                                for user in users {
                                    if let Some(row_action) = user_row::show(ui, user) {
                                        action = Some(row_action);
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            }
        }

        if let Some(action) = action {
            self.on_row_action(action);
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(user) = self.pending_delete.clone() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete user")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Delete {} ({})?", user.name, user.email));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.confirm_delete();
        } else if cancelled {
            self.pending_delete = None;
        }
    }
}

impl eframe::App for UsersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let enabled = !self.modal_open();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(self.status.as_str());
        });
        egui::SidePanel::left("users_sidebar")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| self.show_sidebar(ui));
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                self.show_status_banner(ui);
                self.show_user_list(ui);
            });
        });

        if self.notices.is_active() {
            self.notices.show(ctx);
        } else {
            self.show_delete_confirmation(ctx);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
