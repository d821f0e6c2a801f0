//! One sensor session over replay collaborators.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use facemood_models::SensorEvent;
use facemood_sensor::{
    ChannelHost, LifecycleController, LoopReport, ModelConfig, ModelLoader, ReplayEngine,
    SyntheticCamera,
};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Run a sensor until `stop` resolves, writing host events to `out` as JSON lines.
///
/// Returns the detection loop report, or `None` if the loop never ran.
pub async fn run_session<W, F>(config: &CliConfig, out: &mut W, stop: F) -> CliResult<Option<LoopReport>>
where
    W: Write,
    F: Future<Output = ()>,
{
    config.validate()?;
    let script = config
        .replay_script
        .as_ref()
        .ok_or_else(|| CliError::config("FACEMOOD_REPLAY_SCRIPT is not set"))?;

    let engine = Arc::new(ReplayEngine::load(script).await?);
    let loader = Arc::new(ModelLoader::new(
        engine,
        ModelConfig::with_asset_root(&config.model_dir),
    ));
    let camera = Arc::new(SyntheticCamera::new(config.frame));
    let (host, mut events) = ChannelHost::new();

    let mut sensor =
        LifecycleController::new(camera, loader, Arc::new(host), config.options.clone());
    info!(
        session_id = %sensor.session_id(),
        layout = ?sensor.layout(),
        "Sensor created"
    );

    if let Err(e) = sensor.activate().await {
        drain_events(out, &mut events)?;
        return Err(e.into());
    }

    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            Some(event) = events.recv() => write_event(out, &event)?,
        }
    }

    let report = sensor.shutdown().await;
    drain_events(out, &mut events)?;

    match &report {
        Some(report) => info!(
            iterations = report.iterations,
            detections = report.detections,
            emotion = ?report.emotion.map(|s| s.emotion),
            "Session finished"
        ),
        None => warn!("Session finished without a detection loop"),
    }

    Ok(report)
}

fn write_event<W: Write>(out: &mut W, event: &SensorEvent) -> CliResult<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn drain_events<W: Write>(
    out: &mut W,
    events: &mut mpsc::UnboundedReceiver<SensorEvent>,
) -> CliResult<()> {
    while let Ok(event) = events.try_recv() {
        write_event(out, &event)?;
    }
    Ok(())
}
