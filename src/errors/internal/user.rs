use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    /// The seeded USER role row is missing. This is a fatal configuration
    /// error: lazy provisioning cannot proceed without it and there is no
    /// fallback.
    #[error("Default role {role} not found in roles reference table")]
    DefaultRoleMissing { role: String },
}
