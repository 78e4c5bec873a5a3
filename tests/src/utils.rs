use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;

pub const LOOPBACK: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Binds an ephemeral loopback port. Connections complete as long as the
/// listener is alive, nothing needs to accept them.
pub async fn listening_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
    let port = port_of(&listener);
    (listener, port)
}

/// A loopback port that was just released, so connecting to it is refused.
pub async fn refused_port() -> u16 {
    let (listener, port) = listening_port().await;
    drop(listener);
    port
}

fn port_of(listener: &TcpListener) -> u16 {
    match listener.local_addr().unwrap() {
        SocketAddr::V4(addr) => addr.port(),
        SocketAddr::V6(addr) => addr.port(),
    }
}
