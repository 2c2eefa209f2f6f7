use std::sync::mpsc;

/// Side channel for human-readable status lines emitted during a run.
///
/// Messages must arrive in emission order; nothing else about the text is
/// structured.
pub trait ProgressReporter: Send {
    fn report(&self, message: &str);
}

/// Discards all progress output.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _message: &str) {}
}

/// Forwards progress lines over an mpsc channel, preserving order, so a
/// foreground thread can drain them while the benchmark worker runs.
pub struct ChannelReporter {
    tx: mpsc::Sender<String>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, message: &str) {
        // Receiver may have gone away; progress is best-effort.
        let _ = self.tx.send(message.to_string());
    }
}
