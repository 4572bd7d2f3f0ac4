use validator::Validate;

use crate::error::{AppError, FieldViolation};

use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::store::{User, UserPatch};

fn normalize_email(email: String) -> String {
    email.trim().to_lowercase()
}

fn collect(errors: validator::ValidationErrors) -> Vec<FieldViolation> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldViolation {
                field,
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect()
}

/// Evaluates every create rule and aggregates all violations instead of
/// stopping at the first. No storage call happens on any violation.
pub fn validate_create(mut body: CreateUserRequest) -> Result<User, AppError> {
    // normalize before the format check, as the auth endpoints do
    body.email = body.email.map(normalize_email);
    let mut violations = Vec::new();

    if body.id.is_none() {
        violations.push(FieldViolation {
            field: "id",
            message: "id is required and must be an integer".into(),
        });
    }
    if body.name.is_none() {
        violations.push(FieldViolation {
            field: "name",
            message: "name is required".into(),
        });
    }
    if let Err(errors) = body.validate() {
        violations.extend(collect(errors));
    }

    match (body.id, body.name) {
        (Some(id), Some(name)) if violations.is_empty() => Ok(User {
            id,
            name,
            email: body.email,
            role: body.role.unwrap_or_default(),
        }),
        _ => Err(AppError::Validation(violations)),
    }
}

/// Same rules as create, minus the presence requirements.
pub fn validate_update(mut body: UpdateUserRequest) -> Result<UserPatch, AppError> {
    body.email = body.email.map(normalize_email);
    if let Err(errors) = body.validate() {
        return Err(AppError::Validation(collect(errors)));
    }
    Ok(UserPatch {
        id: body.id,
        name: body.name,
        email: body.email,
        role: body.role,
    })
}
