use anyhow::{Context, Result};
use listenfd::ListenFd;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

const LISTEN_BACKLOG: i32 = 4096;

/// Listener for the proxy: an inherited systemd socket when present, else `host:port`.
pub async fn create_listener(host: &str, port: u16) -> Result<TcpListener> {
    if let Some(listener) = inherited_listener()? {
        return Ok(listener);
    }

    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("server.host '{}' is not an IP address", host))?;
    bind_reusable(SocketAddr::new(ip, port))
}

fn inherited_listener() -> Result<Option<TcpListener>> {
    let Some(std_listener) = ListenFd::from_env().take_tcp_listener(0)? else {
        return Ok(None);
    };
    std_listener.set_nonblocking(true)?;
    let listener = TcpListener::from_std(std_listener)?;
    info!("Serving on socket handed over by systemd ({})", listener.local_addr()?);
    Ok(Some(listener))
}

// SO_REUSEPORT lets a replacement emby302 bind the same port before this one exits.
fn bind_reusable(addr: SocketAddr) -> Result<TcpListener> {
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into()).with_context(|| format!("cannot bind {}", addr))?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(TcpListener::from_std(socket.into())?)
}

/// Resolves on Ctrl+C or SIGTERM; axum then stops accepting and drains open streams.
#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let interrupt = async {
        signal::ctrl_c().await.expect("cannot listen for Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("cannot listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate => "SIGTERM",
    };

    info!("🛑 {} received, emby302 stops accepting connections", received);
}
