//! Reader task and inference worker

use crate::record::FrameRecord;
use crate::settings::ReplaySettings;
use alerting::AdvisoryNotifier;
use anyhow::Context;
use clap::ValueEnum;
use dms::{Advisory, EventDetector, VigilanceAnalysis, VigilanceMonitor};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Frames buffered between the reader and the worker
pub const CHANNEL_CAPACITY: usize = 256;

/// Per-frame output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `VigilanceAnalysis` JSON object per line
    #[default]
    Json,
    /// Human-readable status line
    Text,
}

/// Totals for one replay run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub frames: u64,
    pub faceless_frames: u64,
    /// Lines that were not a valid frame record
    pub malformed_lines: usize,
    /// Frames whose landmarks could not be reduced
    pub rejected_frames: u64,
    pub notifications: usize,
    pub slow_blinks: usize,
    pub yawns: usize,
    pub final_score: f64,
    pub final_advisory: Option<Advisory>,
}

/// Replay every frame from `reader`, writing one line per frame to `writer`
pub async fn replay<R, W>(
    reader: R,
    writer: &mut W,
    settings: ReplaySettings,
    format: OutputFormat,
) -> anyhow::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let mut monitor = VigilanceMonitor::new(settings.dms).context("invalid DMS configuration")?;
    let mut notifier = AdvisoryNotifier::new(settings.alerts);

    let (tx, mut rx) = mpsc::channel::<FrameRecord>(CHANNEL_CAPACITY);
    let reader_task = tokio::spawn(read_frames(reader, tx));

    let mut summary = ReplaySummary {
        final_score: monitor.session().score(),
        ..Default::default()
    };

    while let Some(record) = rx.recv().await {
        let t_ms = record.timestamp_ms();
        let analysis = match record {
            FrameRecord::Ratios(frame) => monitor.step(frame.ear, frame.mar, frame.t_ms),
            FrameRecord::Landmarks(frame) => match monitor.observe(Some(&frame.face()), frame.t_ms) {
                Ok(analysis) => analysis,
                Err(e) => {
                    warn!("Skipping frame at {}ms: {}", t_ms, e);
                    summary.rejected_frames += 1;
                    continue;
                }
            },
            FrameRecord::NoFace(frame) => monitor.observe(None, frame.t_ms)?,
        };

        summary.frames += 1;
        if !analysis.face_detected {
            summary.faceless_frames += 1;
        }
        if let Some(advisory) = analysis.advisory {
            if notifier
                .observe(advisory, analysis.no_evidence, analysis.timestamp_ms)
                .is_some()
            {
                summary.notifications += 1;
            }
        }
        summary.final_score = analysis.score;
        summary.final_advisory = analysis.advisory.or(summary.final_advisory);

        let line = match format {
            OutputFormat::Json => serde_json::to_string(&analysis)?,
            OutputFormat::Text => format_text(&analysis),
        };
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;

    summary.malformed_lines = reader_task
        .await
        .context("frame reader panicked")?
        .context("failed to read input")?;

    let session = monitor.session();
    summary.slow_blinks = session.blink.window().total_recorded();
    summary.yawns = session.yawn.window().total_recorded();

    info!(
        frames = summary.frames,
        faceless = summary.faceless_frames,
        malformed = summary.malformed_lines,
        rejected = summary.rejected_frames,
        notifications = summary.notifications,
        final_score = summary.final_score,
        final_advisory = ?summary.final_advisory.map(|a| a.as_str()),
        "Replay finished"
    );
    Ok(summary)
}

/// Parse lines and forward frames; returns the number of malformed lines
async fn read_frames<R>(reader: R, tx: mpsc::Sender<FrameRecord>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut malformed = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match FrameRecord::parse(line) {
            Ok(record) => {
                if tx.send(record).await.is_err() {
                    debug!("Frame receiver dropped");
                    break;
                }
            }
            Err(e) => {
                warn!("Skipping malformed line {}: {}", line_no, e);
                malformed += 1;
            }
        }
    }

    Ok(malformed)
}

/// Status line in the style of the in-car overlay
pub fn format_text(analysis: &VigilanceAnalysis) -> String {
    match analysis.advisory {
        Some(advisory) => format!(
            "[{:>8}ms] {} {}% | {} | yawns/min {} | slow blinks/min {} | EAR {:.2} MAR {:.2}",
            analysis.timestamp_ms,
            advisory.label(),
            analysis.percentage(),
            advisory.recommendation(),
            analysis.yawns_per_minute,
            analysis.slow_blinks_per_minute,
            analysis.ear.unwrap_or_default(),
            analysis.mar.unwrap_or_default(),
        ),
        None => format!(
            "[{:>8}ms] CALIBRATING | no face detected | last score {}%",
            analysis.timestamp_ms,
            analysis.percentage(),
        ),
    }
}
