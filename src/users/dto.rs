use serde::Deserialize;
use validator::Validate;

use super::store::Role;

/// Body of POST /users. Presence of `id` and `name` is checked by the
/// validation layer so all violations can be reported together.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub id: Option<i64>,
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Body of PUT /users/:id. Absent fields keep their stored values; any field
/// present overwrites, the id included.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: Option<i64>,
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}
