use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use crate::error::RemoteFetchError;

#[derive(Clone)]
pub struct ScpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub key_path: String,
    pub connect_timeout: Duration,
    pub io_timeout: Duration,
}

/// One authenticated remote-copy session. Sessions transfer a single file
/// and are torn down before the handler returns; there is no pooling.
pub trait RemoteSession {
    fn download(&mut self, remote_path: &str) -> Result<Vec<u8>, RemoteFetchError>;
    fn close(&mut self);
}

/// Downloads one file and closes the session whether or not the transfer
/// succeeded.
pub fn transfer<S: RemoteSession>(
    mut session: S,
    remote_path: &str,
) -> Result<Vec<u8>, RemoteFetchError> {
    let result = session.download(remote_path);
    session.close();
    result
}

/// Opens a fresh ssh2 session per fetch. ssh2 is blocking; callers on the
/// request path wrap `fetch` in `spawn_blocking`.
#[derive(Clone)]
pub struct ScpFetcher {
    config: ScpConfig,
}

impl ScpFetcher {
    pub fn new(config: ScpConfig) -> Self {
        Self { config }
    }

    pub fn fetch(&self, remote_path: &str) -> Result<Vec<u8>, RemoteFetchError> {
        let session = Ssh2Session::connect(&self.config)?;
        let bytes = transfer(session, remote_path)?;
        info!(
            "fetched {} bytes from {}:{}",
            bytes.len(),
            self.config.host,
            remote_path
        );
        Ok(bytes)
    }
}

struct Ssh2Session {
    session: ssh2::Session,
}

impl Ssh2Session {
    fn connect(config: &ScpConfig) -> Result<Self, RemoteFetchError> {
        let host = format!("{}:{}", config.host, config.port);

        let addr = host
            .to_socket_addrs()
            .map_err(|e| RemoteFetchError::Connect {
                host: host.clone(),
                source: e,
            })?
            .next()
            .ok_or_else(|| RemoteFetchError::Connect {
                host: host.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "hostname did not resolve",
                ),
            })?;

        let tcp = TcpStream::connect_timeout(&addr, config.connect_timeout).map_err(|e| {
            RemoteFetchError::Connect {
                host: host.clone(),
                source: e,
            }
        })?;
        // The catalog host gave us no timeout to honor; a stuck transfer
        // should fail the request, not wedge a worker.
        tcp.set_read_timeout(Some(config.io_timeout))
            .and_then(|_| tcp.set_write_timeout(Some(config.io_timeout)))
            .map_err(|e| RemoteFetchError::Connect {
                host: host.clone(),
                source: e,
            })?;

        let mut session = ssh2::Session::new().map_err(|e| RemoteFetchError::Handshake {
            host: host.clone(),
            source: e,
        })?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| RemoteFetchError::Handshake {
                host: host.clone(),
                source: e,
            })?;
        session
            .userauth_pubkey_file(&config.user, None, Path::new(&config.key_path), None)
            .map_err(|e| RemoteFetchError::Auth {
                user: config.user.clone(),
                source: e,
            })?;

        Ok(Self { session })
    }
}

impl RemoteSession for Ssh2Session {
    fn download(&mut self, remote_path: &str) -> Result<Vec<u8>, RemoteFetchError> {
        // The path must go through raw: libssh2 single-quotes it when it
        // builds the remote `scp -f` command, so quoting here would leave
        // literal apostrophes in the looked-up filename.
        let (mut channel, stat) = self
            .session
            .scp_recv(Path::new(remote_path))
            .map_err(|e| RemoteFetchError::Transfer {
                path: remote_path.to_string(),
                source: e,
            })?;

        let mut buffer = Vec::with_capacity(stat.size() as usize);
        channel
            .read_to_end(&mut buffer)
            .map_err(|e| RemoteFetchError::Read {
                path: remote_path.to_string(),
                source: e,
            })?;

        let _ = channel.send_eof();
        let _ = channel.wait_eof();
        let _ = channel.wait_close();

        Ok(buffer)
    }

    fn close(&mut self) {
        if let Err(e) = self.session.disconnect(None, "done", None) {
            warn!("scp session disconnect: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeSession {
        payload: Option<Vec<u8>>,
        closed: Arc<AtomicBool>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl RemoteSession for FakeSession {
        fn download(&mut self, remote_path: &str) -> Result<Vec<u8>, RemoteFetchError> {
            self.requested.lock().unwrap().push(remote_path.to_string());
            match self.payload.take() {
                Some(bytes) => Ok(bytes),
                None => Err(RemoteFetchError::Read {
                    path: remote_path.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "transfer aborted"),
                }),
            }
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn fake(payload: Option<Vec<u8>>) -> (FakeSession, Arc<AtomicBool>, Arc<Mutex<Vec<String>>>) {
        let closed = Arc::new(AtomicBool::new(false));
        let requested = Arc::new(Mutex::new(Vec::new()));
        let session = FakeSession {
            payload,
            closed: closed.clone(),
            requested: requested.clone(),
        };
        (session, closed, requested)
    }

    #[test]
    fn session_is_closed_after_successful_transfer() {
        let (session, closed, _) = fake(Some(b"audio".to_vec()));

        let bytes = transfer(session, "/mnt/music/a.m4a").unwrap();
        assert_eq!(bytes, b"audio");
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn session_is_closed_when_transfer_fails() {
        let (session, closed, _) = fake(None);

        assert!(transfer(session, "/mnt/music/a.m4a").is_err());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn remote_path_reaches_the_session_unquoted() {
        // libssh2 quotes the path itself; a second layer here would make
        // every filename with a space unfetchable.
        let (session, _, requested) = fake(Some(b"audio".to_vec()));

        transfer(session, "/mnt/music/My Song.m4a").unwrap();
        assert_eq!(
            requested.lock().unwrap().as_slice(),
            ["/mnt/music/My Song.m4a"]
        );
    }
}
