use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short write: {accepted} of {staged} staged bytes accepted")]
    ShortWrite { staged: usize, accepted: usize },

    #[error("Sink has failed and no longer accepts bytes")]
    SinkFailed,

    #[error("Sink is not attached to a resource")]
    Detached,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(inner) => inner,
            Error::ShortWrite { .. } => {
                std::io::Error::new(std::io::ErrorKind::WriteZero, err)
            }
            Error::SinkFailed | Error::Detached => {
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, err)
            }
        }
    }
}
