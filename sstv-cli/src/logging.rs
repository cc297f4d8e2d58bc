//! Structured logging for decode progress, plus a [`DecoderObserver`]
//! adapter that turns core events into log events.

use crate::config::{LogFormat, LogTarget, LoggingConfig};
use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use sstv_core::{DecoderObserver, LineDecoded, PulseRejected, SyncObserved};
use std::fs::File;
use std::io::{self, BufWriter, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    SyncAccepted { timestamp: DateTime<Utc>, width: String, freq_offset: f64 },
    LineDecoded { timestamp: DateTime<Utc>, row: usize, rows: u8 },
    PulseRejected { timestamp: DateTime<Utc>, width: String },
    Progress(ProgressEvent),
    Info { message: String },
    Warn { message: String },
    Error { message: String, details: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub timestamp: DateTime<Utc>,
    pub mode_name: String,
    pub current_line: usize,
    pub total_lines: usize,
    pub progress_percent: f64,
    pub frequency_hz: i64,
    pub signal_strength_pct: f64,
}

pub struct StructuredLogger {
    config: LoggingConfig,
    writer: Box<dyn Write + Send>,
    start_time: DateTime<Utc>,
}

impl StructuredLogger {
    pub fn new(config: LoggingConfig) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match &config.target {
            LogTarget::Stdout => Box::new(io::stdout()),
            LogTarget::Stderr => Box::new(io::stderr()),
            LogTarget::File => {
                let path = config
                    .file_path
                    .as_ref()
                    .ok_or_else(|| color_eyre::eyre::eyre!("file path required for file logging"))?;
                Box::new(BufWriter::new(File::create(path)?))
            }
        };

        Ok(Self { config, writer, start_time: Utc::now() })
    }

    pub fn log(&mut self, event: LogEvent) -> Result<()> {
        let output = match self.config.format {
            LogFormat::Json => serde_json::to_string(&event)?,
            LogFormat::Logfmt => self.format_logfmt(&event),
            LogFormat::Pretty => self.format_pretty(&event),
        };
        writeln!(self.writer, "{}", output)?;
        self.writer.flush()?;
        Ok(())
    }

    fn format_logfmt(&self, event: &LogEvent) -> String {
        let ts = Utc::now().to_rfc3339();
        match event {
            LogEvent::SyncAccepted { width, freq_offset, .. } => {
                format!("ts=\"{}\" type=sync width={} freq_offset={:.4}", ts, width, freq_offset)
            }
            LogEvent::LineDecoded { row, rows, .. } => {
                format!("ts=\"{}\" type=line row={} rows={}", ts, row, rows)
            }
            LogEvent::PulseRejected { width, .. } => {
                format!("ts=\"{}\" type=reject width={}", ts, width)
            }
            LogEvent::Progress(p) => format!(
                "ts=\"{}\" type=progress mode={} line={}/{} pct={:.1} freq_hz={} strength={:.1}",
                ts, p.mode_name, p.current_line, p.total_lines, p.progress_percent, p.frequency_hz, p.signal_strength_pct
            ),
            LogEvent::Info { message } => format!("ts=\"{}\" level=info msg=\"{}\"", ts, message),
            LogEvent::Warn { message } => format!("ts=\"{}\" level=warn msg=\"{}\"", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("ts=\"{}\" level=error msg=\"{}\" details=\"{}\"", ts, message, d),
                None => format!("ts=\"{}\" level=error msg=\"{}\"", ts, message),
            },
        }
    }

    fn format_pretty(&self, event: &LogEvent) -> String {
        let ts = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match event {
            LogEvent::SyncAccepted { width, freq_offset, .. } => {
                format!("[{}] SYNC: {} freq_offset={:.4}", ts, width, freq_offset)
            }
            LogEvent::LineDecoded { row, rows, .. } => format!("[{}] LINE: row={} rows={}", ts, row, rows),
            LogEvent::PulseRejected { width, .. } => format!("[{}] REJECT: {}", ts, width),
            LogEvent::Progress(p) => format!(
                "[{}] {} line {}/{} ({:.1}%) | {} Hz | strength {:.1}%",
                ts, p.mode_name, p.current_line, p.total_lines, p.progress_percent, p.frequency_hz, p.signal_strength_pct
            ),
            LogEvent::Info { message } => format!("[{}] INFO: {}", ts, message),
            LogEvent::Warn { message } => format!("[{}] WARN: {}", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("[{}] ERROR: {} | {}", ts, message, d),
                None => format!("[{}] ERROR: {}", ts, message),
            },
        }
    }

    pub fn elapsed(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// Bridges core decoder events into a [`StructuredLogger`]. Log write
/// failures are swallowed: a logging hiccup must never interrupt decode.
pub struct CliObserver<'a> {
    logger: &'a mut StructuredLogger,
}

impl<'a> CliObserver<'a> {
    pub fn new(logger: &'a mut StructuredLogger) -> Self {
        Self { logger }
    }
}

impl DecoderObserver for CliObserver<'_> {
    fn on_sync(&mut self, event: SyncObserved) {
        let _ = self.logger.log(LogEvent::SyncAccepted {
            timestamp: Utc::now(),
            width: format!("{:?}", event.width),
            freq_offset: event.freq_offset,
        });
    }

    fn on_line(&mut self, event: LineDecoded) {
        let _ = self.logger.log(LogEvent::LineDecoded {
            timestamp: Utc::now(),
            row: event.row,
            rows: event.rows,
        });
    }

    fn on_reject(&mut self, event: PulseRejected) {
        let _ = self.logger.log(LogEvent::PulseRejected {
            timestamp: Utc::now(),
            width: format!("{:?}", event.width),
        });
    }
}
