use serde::Deserialize;
use validator::Validate;

use crate::models::stage::CompletionKind;

// ---------------------------------------------------------------------------
// Usuarios
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: String,

    #[validate(length(min = 1))]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: Option<String>,

    #[validate(length(min = 1))]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Etapas del pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStageRequest {
    #[validate(range(min = 1, max = 1000))]
    pub order_num: i32,

    #[validate(length(min = 1, max = 100))]
    pub stage_name: String,

    #[validate(length(min = 1, max = 50))]
    pub role: String,

    #[validate(length(min = 1, max = 100))]
    pub completion_field: String,

    pub completion_type: CompletionKind,

    #[validate(length(min = 1, max = 100))]
    pub list_name: Option<String>,

    #[validate(range(min = 1, max = 8760))]
    pub target_hours: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_hex_color")]
    pub stage_color: String,

    pub is_terminal: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStageRequest {
    #[validate(range(min = 1, max = 1000))]
    pub order_num: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub stage_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub completion_field: Option<String>,

    pub completion_type: Option<CompletionKind>,

    #[validate(length(min = 1, max = 100))]
    pub list_name: Option<String>,

    #[validate(range(min = 1, max = 8760))]
    pub target_hours: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_hex_color")]
    pub stage_color: Option<String>,

    pub is_terminal: Option<bool>,
}

// ---------------------------------------------------------------------------
// Listas desplegables
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDropdownRequest {
    #[validate(length(min = 1, max = 100))]
    pub list_name: String,

    #[validate(length(min = 1))]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDropdownRequest {
    #[validate(length(min = 1, max = 100))]
    pub list_name: Option<String>,

    #[validate(length(min = 1))]
    pub values: Option<Vec<String>>,
}
