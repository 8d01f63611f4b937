use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid color '{value}': expected #rrggbb")]
    InvalidColor { value: String },
    #[error("duplicate code {code} in codebook {codebook}")]
    DuplicateCode { codebook: String, code: i64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
