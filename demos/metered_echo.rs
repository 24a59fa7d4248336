//! QUIC loopback echo through a metered connection.
//!
//! Run with: RUST_LOG=meterconn=trace cargo run --example metered_echo

use meterconn::metrics::{init_metrics, metrics_meter, ByteCounters};
use meterconn::quic::{QuicConfig, QuicEndpoint};
use meterconn::{Meter, MeteredConnection, MuxConnection, MuxStream};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MESSAGES: &[&[u8]] = &[b"hello", b"metered", b"world"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("a rustls crypto provider is already installed"))?;
    init_metrics();

    let config = QuicConfig {
        bind_addr: "127.0.0.1:0".parse()?,
        insecure_skip_verify: true,
        ..Default::default()
    };

    let server = Arc::new(QuicEndpoint::new(config.clone()).await?);
    let server_addr = server.local_addr()?;
    println!("Echo server listening on {server_addr}");

    let server_task = tokio::spawn({
        let server = server.clone();
        async move {
            let conn = server.accept().await?;
            loop {
                let mut stream = match conn.accept_stream().await {
                    Ok(stream) => stream,
                    Err(_) => break,
                };
                let mut data = Vec::new();
                stream.read_to_end(&mut data).await?;
                stream.write_all(&data).await?;
                stream.close()?;
            }
            anyhow::Ok(())
        }
    });

    // Count locally and on the global metrics recorder at the same time
    let counters = ByteCounters::new();
    let local = counters.meter();
    let global = metrics_meter(server_addr.to_string());
    let meter = Meter::new(
        {
            let (local, global) = (local.clone(), global.clone());
            move |n| {
                local.record_read(n);
                global.record_read(n);
            }
        },
        move |n| {
            local.record_write(n);
            global.record_write(n);
        },
    );

    let client = QuicEndpoint::new(config).await?;
    let conn = MeteredConnection::with_meter(client.connect(server_addr).await?, meter);

    for message in MESSAGES {
        let mut stream = conn.open_stream().await?;
        stream.write_all(message).await?;
        stream.close()?;

        let mut echoed = Vec::new();
        stream.read_to_end(&mut echoed).await?;
        println!("  echoed {:?}", String::from_utf8_lossy(&echoed));
    }

    conn.close()?;
    server_task.await??;

    let totals = counters.snapshot();
    println!(
        "Client totals: {} bytes read, {} bytes written",
        totals.read, totals.written
    );

    client.close();
    client.wait_idle().await;
    Ok(())
}
