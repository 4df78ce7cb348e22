use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two classes in one dump claimed the same internal variable
    #[error("Variable '{var_id}' already bound to {existing}, cannot bind it to {incoming}")]
    DuplicateVariable {
        var_id: String,
        existing: String,
        incoming: String,
    },

    #[error("Unknown class id: {0}")]
    UnknownClass(usize),
}
