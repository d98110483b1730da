//! Minimal duplex echo — two connections over an in-process channel pair.
//!
//! Run with:
//!   cargo run --example echo

use framelink_channel::MemoryChannel;
use framelink_conn::{FrameSupply, MessageConnection};
use framelink_frame::Frame;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (client_chan, server_chan) = MemoryChannel::pair();
    let client = MessageConnection::new(client_chan);
    let server = MessageConnection::new(server_chan);

    // Server: echo every inbound frame back until the peer disposes.
    let echo = tokio::spawn(async move {
        while let Ok(Some(frame)) = server.recv().await {
            eprintln!("server received {} payload bytes", frame.payload_len());
            if server.send(FrameSupply::fused(vec![frame])).await.is_err() {
                break;
            }
        }
        eprintln!("server: peer disconnected");
    });

    let outbound = vec![
        Frame::from_message(b"hello")?,
        Frame::from_message(b"framelink")?,
    ];
    client.send(FrameSupply::fused(outbound)).await?;

    for _ in 0..2 {
        let frame = client
            .recv()
            .await?
            .ok_or("connection closed before all echoes arrived")?;
        eprintln!(
            "client received echo: {:?}",
            String::from_utf8_lossy(frame.payload())
        );
    }

    client.dispose();
    client.closed().await;
    echo.await?;
    Ok(())
}
