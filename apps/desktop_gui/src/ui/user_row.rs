use shared::domain::{User, UserId};

pub const EDIT_LABEL: &str = "Edit";
pub const DELETE_LABEL: &str = "Delete";
pub const COLUMN_HEADERS: [&str; 5] = ["ID", "Name", "Email", "Age", "Actions"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Edit(UserId),
    Delete(User),
}

/// Display text for the id, name, email and age columns. Age is blank when absent.
pub fn cells(user: &User) -> [String; 4] {
    [
        user.id.to_string(),
        user.name.clone(),
        user.email.clone(),
        user.age.map(|age| age.to_string()).unwrap_or_default(),
    ]
}

/// Renders one grid row; the caller ends the row.
pub fn show(ui: &mut egui::Ui, user: &User) -> Option<RowAction> {
    for cell in cells(user) {
        ui.label(cell);
    }

    let mut action = None;
    ui.horizontal(|ui| {
        if ui.small_button(EDIT_LABEL).clicked() {
            action = Some(RowAction::Edit(user.id));
        }
        if ui.small_button(DELETE_LABEL).clicked() {
            action = Some(RowAction::Delete(user.clone()));
        }
    });
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_columns() {
        let user = User {
            id: UserId(1),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            age: Some(30),
            role: None,
        };
        assert_eq!(cells(&user), ["1", "Ana", "a@x.com", "30"].map(String::from));
    }

    #[test]
    fn missing_age_is_blank() {
        let user = User {
            id: UserId(2),
            name: "Bea".to_string(),
            email: "b@x.com".to_string(),
            age: None,
            role: Some("cliente".to_string()),
        };
        assert_eq!(cells(&user)[3], "");
    }
}
