//! Sidebar form collecting a new user's name, email and optional age.

use shared::domain::{DraftError, UserDraft};

pub enum FormAction {
    Submit(UserDraft),
    Rejected(DraftError),
}

#[derive(Debug, Default)]
pub struct CreateUserForm {
    pub draft: UserDraft,
    submitting: bool,
}

impl CreateUserForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates the draft locally. A valid draft is handed out for queueing and
    /// the form stays locked until the backend answers.
    pub fn submit(&mut self) -> FormAction {
        match self.draft.to_new_user() {
            Ok(_) => {
                self.submitting = true;
                FormAction::Submit(self.draft.clone())
            }
            Err(err) => FormAction::Rejected(err),
        }
    }

    pub fn finish_success(&mut self) {
        self.submitting = false;
        self.draft.clear();
    }

    /// The draft is kept so the user can correct and retry.
    pub fn finish_failure(&mut self) {
        self.submitting = false;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<FormAction> {
        let mut action = None;
        ui.heading("Add user");
        ui.add_space(4.0);

        ui.add_enabled_ui(!self.is_submitting(), |ui| {
            egui::Grid::new("create_user_form")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.add(egui::TextEdit::singleline(&mut self.draft.name).hint_text("Name"));
                    ui.end_row();

                    ui.label("Email");
                    ui.add(egui::TextEdit::singleline(&mut self.draft.email).hint_text("Email"));
                    ui.end_row();

                    ui.label("Age");
                    ui.add(egui::TextEdit::singleline(&mut self.draft.age).hint_text("Optional"));
                    ui.end_row();
                });

            ui.add_space(6.0);
            let label = if self.is_submitting() { "Adding..." } else { "Add" };
            if ui.button(label).clicked() {
                action = Some(self.submit());
            }
        });

        action
    }
}
