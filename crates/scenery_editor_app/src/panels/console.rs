// SPDX-License-Identifier: MIT OR Apache-2.0
//! Console panel - Log output.

use std::collections::VecDeque;
use std::sync::mpsc;

/// A tracing event captured by the [`TracingBridge`] layer.
#[derive(Debug, Clone)]
pub struct TracingEvent {
    /// The log level.
    pub level: LogLevel,
    /// The formatted message.
    pub message: String,
    /// Module path that emitted the event.
    pub target: String,
}

/// A `tracing_subscriber::Layer` that forwards events over an `mpsc` channel
/// so the [`ConsolePanel`] can display them.
pub struct TracingBridge {
    sender: mpsc::Sender<TracingEvent>,
}

impl TracingBridge {
    /// Create a new bridge and return `(layer, receiver)`.
    pub fn new() -> (Self, mpsc::Receiver<TracingEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<S> tracing_subscriber::Layer<S> for TracingBridge
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        // The receiver is gone once the console is dropped at shutdown.
        let _ = self.sender.send(TracingEvent {
            level: LogLevel::from(*event.metadata().level()),
            message: visitor.message,
            target: event.metadata().target().to_string(),
        });
    }
}

/// Collects the `message` field plus any extra fields as `name = value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let text = if field.name() == "message" {
            format!("{value:?}")
        } else {
            format!("{} = {:?}", field.name(), value)
        };
        if !self.message.is_empty() {
            self.message.push_str(", ");
        }
        self.message.push_str(&text);
    }
}

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Very verbose diagnostics
    Trace,
    /// Debugging output
    Debug,
    /// Normal operation
    Info,
    /// Recoverable problems
    Warn,
    /// Failures
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

    fn name(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            Self::Trace => egui::Color32::from_rgb(100, 100, 100),
            Self::Debug => egui::Color32::from_rgb(150, 150, 150),
            Self::Info => egui::Color32::from_rgb(200, 200, 200),
            Self::Warn => egui::Color32::from_rgb(255, 200, 80),
            Self::Error => egui::Color32::from_rgb(255, 100, 100),
        }
    }
}

/// A log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Message, prefixed with its target
    pub message: String,
    /// Number of identical consecutive messages collapsed into this one
    pub count: u32,
}

/// The console panel
pub struct ConsolePanel {
    tracing_rx: Option<mpsc::Receiver<TracingEvent>>,
    /// Log entries, oldest first
    pub entries: VecDeque<LogEntry>,
    /// Maximum entries to keep
    pub max_entries: usize,
    /// Minimum log level to show
    pub min_level: LogLevel,
    /// Auto-scroll to bottom
    pub auto_scroll: bool,
}

impl ConsolePanel {
    /// Create a console wired to a tracing receiver.
    pub fn with_tracing_receiver(tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        Self {
            tracing_rx,
            entries: VecDeque::new(),
            max_entries: 1000,
            min_level: LogLevel::Info,
            auto_scroll: true,
        }
    }

    /// Add a log entry, collapsing it into the previous one when identical
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        if let Some(last) = self.entries.back_mut() {
            if last.level == level && last.message == message {
                last.count += 1;
                return;
            }
        }

        self.entries.push_back(LogEntry {
            level,
            message,
            count: 1,
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Drain any pending tracing events into the log.
    pub fn poll_tracing_events(&mut self) {
        let Some(rx) = &self.tracing_rx else {
            return;
        };
        let events: Vec<_> = rx.try_iter().collect();
        for event in events {
            self.log(event.level, format!("[{}] {}", event.target, event.message));
        }
    }

    /// Render the console panel
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll_tracing_events();

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("console_min_level")
                .selected_text(self.min_level.name())
                .show_ui(ui, |ui| {
                    for level in LogLevel::ALL {
                        ui.selectable_value(&mut self.min_level, level, level.name());
                    }
                });
            ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            if ui.button("Clear").clicked() {
                self.entries.clear();
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(self.auto_scroll)
            .show(ui, |ui| {
                for entry in self.entries.iter().filter(|e| e.level >= self.min_level) {
                    let text = if entry.count > 1 {
                        format!("{} ({}x)", entry.message, entry.count)
                    } else {
                        entry.message.clone()
                    };
                    ui.horizontal(|ui| {
                        ui.colored_label(entry.level.color(), entry.level.name());
                        ui.label(egui::RichText::new(text).monospace());
                    });
                }
            });
    }
}
