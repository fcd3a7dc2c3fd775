use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

pub trait Tracker {
    type Ctx: Clone;
    type Inc: Clone;
    fn new(ctx: Self::Ctx) -> Self;
    fn step(&self, step: Self::Inc) -> &Self;
    fn finish(&self, msg: Option<String>);
}

const PB_STYLE: &str = "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const SPINNER_STYLE: &str = "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

// Unknown length: no bar, just a byte counter.
static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

pub struct ProgressTracker {
    pub pb: ProgressBar,
}

#[derive(Debug, Clone)]
pub struct ProgressTrackerConfig {
    pub len: Option<u64>,
    pub msg: Option<String>,
}

impl Tracker for ProgressTracker {
    type Ctx = ProgressTrackerConfig;
    type Inc = u64;

    fn new(ctx: Self::Ctx) -> Self {
        let (pb, style) = match ctx.len {
            Some(len) => (ProgressBar::new(len), PB_TEMPLATE.as_ref()),
            None => (ProgressBar::no_length(), SPINNER_TEMPLATE.as_ref()),
        };

        let pb = match style {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        let pb = pb.with_message(ctx.msg.unwrap_or_default());

        ProgressTracker { pb }
    }

    fn step(&self, len: u64) -> &Self {
        self.pb.inc(len);
        self
    }

    fn finish(&self, msg: Option<String>) {
        match msg {
            Some(msg) => self.pb.finish_with_message(msg),
            None => self.pb.finish(),
        }
    }
}
