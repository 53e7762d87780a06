//! Client-side checks that run before any request is issued.

use crate::models::{CreateFolderRequest, LoginRequest, RegisterRequest};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Email is required.")]
    MissingEmail,
    #[error("Password is required.")]
    MissingPassword,
    #[error("Username is required.")]
    MissingUsername,
    #[error("Folder name is required.")]
    MissingFolderName,
    #[error("Select file, title, and folder.")]
    IncompleteUpload,
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(FormError::MissingUsername);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

pub fn validate_folder_name(name: &str) -> Result<CreateFolderRequest, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::MissingFolderName);
    }
    Ok(CreateFolderRequest {
        name: name.to_string(),
    })
}

/// Title, target folder and a chosen file are all required.
pub fn validate_upload(
    title: &str,
    folder_id: Option<&str>,
    file_selected: bool,
) -> Result<(), FormError> {
    let has_folder = folder_id.is_some_and(|id| !id.trim().is_empty());
    if title.trim().is_empty() || !has_folder || !file_selected {
        return Err(FormError::IncompleteUpload);
    }
    Ok(())
}
