use crate::channel::{ChannelEvent, SignalingChannel};
use crate::error::SessionError;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Open a WebSocket to the relay and start its reader/writer pumps.
///
/// The returned receiver yields `Opened` first and `Closed` exactly once when
/// either pump stops. Nothing reconnects.
pub async fn connect(
    url: &str,
) -> Result<(SignalingChannel, mpsc::UnboundedReceiver<ChannelEvent>), SessionError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| SessionError::Transport(format!("websocket connect failed: {e}")))?;
    info!("WebSocket connected to relay {}", url);

    let (mut sender, mut receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ChannelEvent>();

    let _ = event_tx.send(ChannelEvent::Opened);

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if let Err(e) = sender.send(Message::Text(text)).await {
                warn!("WebSocket send failed: {}", e);
                return;
            }
        }
        // Session dropped its channel: say goodbye properly.
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut recv_task = tokio::spawn({
        let event_tx = event_tx.clone();

        async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        debug!("WS IN: {}", text);
                        if event_tx.send(ChannelEvent::Message(text)).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Binary(data)) => match String::from_utf8(data) {
                        Ok(text) => {
                            if event_tx.send(ChannelEvent::Message(text)).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Dropping non UTF-8 binary frame: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        let _ = event_tx.send(ChannelEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
        }
    });

    tokio::spawn(async move {
        tokio::select! {
            _ = (&mut send_task) => recv_task.abort(),
            _ = (&mut recv_task) => send_task.abort(),
        };
        info!("WebSocket to relay closed");
        let _ = event_tx.send(ChannelEvent::Closed);
    });

    Ok((SignalingChannel::new(out_tx), event_rx))
}
