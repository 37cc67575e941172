//! WebSocket server for live-reload clients.
//!
//! Accepts browser connections on the fixed secondary port and broadcasts
//! reload messages to all of them. Dead clients are pruned on send.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;

/// Fixed live-reload port, not configurable
pub const RELOAD_PORT: u16 = 3001;

/// Broadcasts reload messages to connected browser clients
#[derive(Clone)]
pub struct Broadcaster {
    /// Connected clients (shared between accept thread and broadcasts)
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Bind the listener and spawn the accept thread.
    pub fn bind(&self, port: u16) -> Result<()> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .map_err(|e| anyhow::anyhow!("failed to bind live-reload port {}: {}", port, e))?;
        listener.set_nonblocking(true)?;

        let clients = Arc::clone(&self.clients);
        std::thread::spawn(move || accept_loop(&listener, &clients));
        Ok(())
    }

    /// Send a message to all connected clients, pruning dead ones.
    pub fn broadcast(&self, msg: &ReloadMessage) {
        let text = msg.to_json();
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(Message::Text(text.clone().into())) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", count);
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

fn accept_loop(listener: &TcpListener, clients: &Mutex<Vec<WebSocket<TcpStream>>>) {
    loop {
        if crate::core::is_shutdown() {
            break;
        }

        match listener.accept() {
            Ok((stream, addr)) => {
                crate::debug!("reload"; "client connected: {}", addr);
                // Handshake and sends are blocking operations
                let _ = stream.set_nonblocking(false);
                add_client(stream, clients);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                crate::log!("reload"; "accept error: {}", e);
                std::thread::sleep(Duration::from_millis(100));
            }
        }
    }
}

fn add_client(stream: TcpStream, clients: &Mutex<Vec<WebSocket<TcpStream>>>) {
    match tungstenite::accept(stream) {
        Ok(mut ws) => {
            let greeting = ReloadMessage::connected();
            if let Err(e) = ws.send(Message::Text(greeting.to_json().into())) {
                crate::log!("reload"; "failed to send connected message: {}", e);
                return;
            }

            let mut clients = clients.lock();
            crate::debug!("reload"; "client registered (total: {})", clients.len() + 1);
            clients.push(ws);
        }
        Err(e) => {
            crate::log!("reload"; "handshake failed: {}", e);
        }
    }
}
