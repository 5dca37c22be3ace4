use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevealError>;

#[derive(Error, Debug)]
pub enum RevealError {
    #[error("Invalid reveal configuration: {0}")]
    Config(String),

    #[error("Surface too large: {width}x{height}")]
    SurfaceTooLarge { width: u32, height: u32 },
}
