use thiserror::Error;

/// Failure opening or using the per-request SCP session. The client only
/// sees a generic server error; the variants exist so the log line can tell
/// an operator which stage gave out.
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("could not connect to {host}: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ssh handshake with {host} failed: {source}")]
    Handshake {
        host: String,
        #[source]
        source: ssh2::Error,
    },
    #[error("public-key authentication for {user} failed: {source}")]
    Auth {
        user: String,
        #[source]
        source: ssh2::Error,
    },
    #[error("scp transfer of {path} failed: {source}")]
    Transfer {
        path: String,
        #[source]
        source: ssh2::Error,
    },
    #[error("reading {path} from remote failed: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure talking to the transcoding service. A non-2xx status is a hard
/// failure; the untranscoded bytes are never substituted for the client.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("transcoder request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("transcoder returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Outcome of the download pipeline, propagated by value instead of thrown.
/// Not-found is a value here, not an error condition worth a stack trace.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("track not found")]
    NotFound,
    #[error("catalog query failed: {0}")]
    Catalog(#[from] sea_orm::DbErr),
    #[error("fetch task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
