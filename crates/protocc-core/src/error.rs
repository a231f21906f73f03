use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),
    #[error("variable ${{{name}}} referenced by instruction {index} before it is declared")]
    UndeclaredVariable { name: String, index: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
