use std::{io, net::SocketAddr};

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use super::content::ContentError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("blog content unavailable")]
    Content(#[from] ContentError),
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] TryInitError),
}
