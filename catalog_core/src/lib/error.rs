#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("StdIoError")]
    StdIoError(#[from] std::io::Error),
    #[error("AddrParseError")]
    AddrParseError(#[from] std::net::AddrParseError),
    #[error("TlsMaterialError `{0}`")]
    TlsMaterial(String),
    #[error("ListenerError")]
    Listener(#[from] catalog_types::CatalogError),
    #[error("TaskJoinError")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
