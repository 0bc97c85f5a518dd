//! Colorful console output for fleet searches.
//!
//! Provides a custom `tracing` layer that renders the structured events of
//! `fleetforge-solver` as one readable line each. Enabled through the
//! `console` feature of the `fleetforge` crate.
//!
//! The filter defaults to `fleetforge_solver=info` and can be overridden
//! with `RUST_LOG`, e.g. `RUST_LOG=fleetforge_solver=debug` to also see
//! every oracle call.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::{OwoColorize, Style};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

const DEFAULT_FILTER: &str = "fleetforge_solver=info";

/// Initializes console output on stdout.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    install(FleetConsoleLayer::new());
}

/// Initializes console output on stdout and additionally appends every
/// line, without colors, to a log file.
///
/// Has no effect if console output was already initialized.
///
/// # Errors
///
/// Returns the I/O error if `path` cannot be opened for appending.
pub fn init_with_log_file(path: impl AsRef<Path>) -> io::Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }
    install(FleetConsoleLayer::new().with_log_file(path)?);
    Ok(())
}

fn install(layer: FleetConsoleLayer) {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // another global subscriber wins; ours is then silently unused
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}

/// A tracing layer that formats fleet search events.
///
/// Writes colored lines to stdout and, with a log file, the same lines
/// uncolored to that file.
pub struct FleetConsoleLayer {
    stdout: bool,
    log_file: Option<Mutex<File>>,
}

impl FleetConsoleLayer {
    /// Colored output on stdout.
    pub fn new() -> Self {
        Self {
            stdout: true,
            log_file: None,
        }
    }

    /// Also appends uncolored lines to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if `path` cannot be opened for appending.
    pub fn with_log_file(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.log_file = Some(Mutex::new(file));
        Ok(self)
    }

    /// Stops writing to stdout, leaving only the log file.
    pub fn without_stdout(mut self) -> Self {
        self.stdout = false;
        self
    }

    fn render(&self, level: Level, visitor: &EventVisitor, elapsed_ms: u64, colored: bool) -> String {
        let prefix = paint(&format_elapsed(elapsed_ms), dim(), colored);
        format!("{} {}", prefix, format_event(level, visitor, colored))
    }
}

impl Default for FleetConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Subscriber> Layer<S> for FleetConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("fleetforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let elapsed = EPOCH
            .get()
            .map(|epoch| epoch.elapsed().as_millis() as u64)
            .unwrap_or(0);

        if self.stdout {
            let line = self.render(level, &visitor, elapsed, true);
            let _ = writeln!(io::stdout().lock(), "{}", line);
        }
        if let Some(file) = &self.log_file {
            let line = self.render(level, &visitor, elapsed, false);
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::I64(v) => write!(f, "{}", v),
            FieldValue::F64(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Str(v) => f.write_str(v),
        }
    }
}

/// Event fields in recording order; `event` and `message` kept apart.
#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    fields: Vec<(&'static str, FieldValue)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: FieldValue) {
        match (field.name(), value) {
            ("event", FieldValue::Str(s)) => self.event = Some(s),
            ("message", FieldValue::Str(s)) => self.message = Some(s),
            (name, value) => self.fields.push((name, value)),
        }
    }

    fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn u64(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(FieldValue::U64(v)) => *v,
            Some(FieldValue::I64(v)) => (*v).max(0) as u64,
            _ => 0,
        }
    }

    fn f64(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(FieldValue::F64(v)) => *v,
            Some(FieldValue::U64(v)) => *v as f64,
            Some(FieldValue::I64(v)) => *v as f64,
            _ => 0.0,
        }
    }

    fn bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FieldValue::Bool(true)))
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let s = format!("{:?}", value);
        self.push(field, FieldValue::Str(s.trim_matches('"').to_string()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, FieldValue::U64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, FieldValue::I64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, FieldValue::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, FieldValue::Str(value.to_string()));
    }
}

fn format_event(level: Level, v: &EventVisitor, colored: bool) -> String {
    let body = match v.event.as_deref() {
        Some("solve_start") => format_solve_start(v, colored),
        Some("phase_start") => format_phase_start(v, colored),
        Some("phase_end") => format_phase_end(v, colored),
        Some("removal_accepted") => format_removal_accepted(v, colored),
        Some("switch_accepted") => format_switch_accepted(v, colored),
        Some("statistics") => format_statistics(v, colored),
        Some("solve_end") => format_solve_end(v, colored),
        Some("solve_failed") => format_solve_failed(v, colored),
        Some("energy_deficit") => format_energy_deficit(v, colored),
        _ => format_generic(v, colored),
    };
    format!("{} {}", format_level(level, colored), body)
}

fn format_level(level: Level, colored: bool) -> String {
    let style = match level {
        Level::ERROR => Style::new().bright_red().bold(),
        Level::WARN => Style::new().bright_yellow(),
        Level::INFO => Style::new().bright_green(),
        _ => Style::new().bright_black(),
    };
    paint(&format!("{:<5}", level.as_str()), style, colored)
}

fn format_solve_start(v: &EventVisitor, colored: bool) -> String {
    format!(
        "{} Solving started: vehicles ({}), vehicle types ({}), init ({}), time limit ({})",
        tag("Solver", colored),
        paint(&count(v.u64("vehicles")), number(), colored),
        paint(&count(v.u64("vehicle_types")), number(), colored),
        v.str("init_strategy").unwrap_or("N/A"),
        paint(&format_seconds(v.f64("time_limit_secs")), number(), colored),
    )
}

fn format_phase_start(v: &EventVisitor, colored: bool) -> String {
    let phase = v.str("phase").unwrap_or("Unknown");
    let mut line = format!(
        "{} {} started: vehicles ({})",
        tag(phase, colored),
        paint(phase, Style::new().white().bold(), colored),
        paint(&count(v.u64("vehicles")), number(), colored),
    );
    if v.get("cost").is_some() {
        line.push_str(&format!(", cost ({})", format_cost(v.f64("cost"), colored)));
    }
    line
}

fn format_phase_end(v: &EventVisitor, colored: bool) -> String {
    let phase = v.str("phase").unwrap_or("Unknown");
    let mut line = format!(
        "{} {} ended: time spent ({}), oracle calls ({}), vehicles ({}), cost ({})",
        tag(phase, colored),
        paint(phase, Style::new().white().bold(), colored),
        paint(&format_duration_ms(v.u64("duration_ms")), number(), colored),
        paint(&count(v.u64("oracle_calls")), number(), colored),
        paint(&count(v.u64("vehicles")), number(), colored),
        format_cost(v.f64("cost"), colored),
    );
    if v.bool("no_options_left") {
        line.push_str(", no options left");
    }
    line
}

fn format_removal_accepted(v: &EventVisitor, colored: bool) -> String {
    format!(
        "    {} removed {} ({}) | vehicles {} | cost {}",
        paint("->", Style::new().bright_blue(), colored),
        v.str("name").unwrap_or("?"),
        v.u64("vehicle"),
        count(v.u64("vehicles")),
        format_cost(v.f64("cost"), colored),
    )
}

fn format_switch_accepted(v: &EventVisitor, colored: bool) -> String {
    format!(
        "    {} switched {} for {} | saving {} | cost {}",
        paint("->", Style::new().bright_blue(), colored),
        v.str("outgoing").unwrap_or("[]"),
        v.str("incoming").unwrap_or("[]"),
        paint(&format!("{:.2}", v.f64("saving")), Style::new().bright_green(), colored),
        format_cost(v.f64("cost"), colored),
    )
}

fn format_statistics(v: &EventVisitor, colored: bool) -> String {
    format!(
        "{} {}: oracle calls ({}), feasible ({} in {}), infeasible ({} in {}), timeouts ({} in {}), blacklist hits ({}), failed removals ({})",
        tag("Statistics", colored),
        v.str("label").unwrap_or("search"),
        paint(&count(v.u64("iterations")), number(), colored),
        count(v.u64("feasible")),
        format_seconds(v.f64("feasible_secs")),
        count(v.u64("infeasible")),
        format_seconds(v.f64("infeasible_secs")),
        count(v.u64("timeouts")),
        format_seconds(v.f64("timeout_secs")),
        count(v.u64("blacklist_hits")),
        count(v.u64("failed_removals")),
    )
}

fn format_solve_end(v: &EventVisitor, colored: bool) -> String {
    format!(
        "{} Solving ended: time spent ({}), vehicles ({}), cost ({}), throughput ({:.2}), routing time limit ({})",
        tag("Solver", colored),
        paint(&format_duration_ms(v.u64("duration_ms")), number(), colored),
        paint(&count(v.u64("vehicles")), number(), colored),
        format_cost(v.f64("cost"), colored),
        v.f64("throughput"),
        paint(&format_seconds(v.f64("routing_time_limit_secs")), number(), colored),
    )
}

fn format_solve_failed(v: &EventVisitor, colored: bool) -> String {
    let reason = if v.bool("infeasible_instance") {
        "instance is infeasible"
    } else {
        "search aborted"
    };
    format!(
        "{} Solving failed ({}): {}",
        tag("Solver", colored),
        paint(reason, Style::new().bright_red(), colored),
        v.str("error").unwrap_or("unknown error"),
    )
}

fn format_energy_deficit(v: &EventVisitor, colored: bool) -> String {
    format!(
        "{} Energy deficit: required ({:.2}) exceeds available ({:.2})",
        tag("Greedy Init", colored),
        v.f64("required"),
        v.f64("available"),
    )
}

fn format_generic(v: &EventVisitor, colored: bool) -> String {
    let mut line = match (&v.event, &v.message) {
        (Some(event), _) => paint(event, Style::new().white().bold(), colored),
        (None, Some(message)) => message.clone(),
        (None, None) => String::new(),
    };
    for (name, value) in &v.fields {
        line.push_str(&format!(" {}={}", name, value));
    }
    line
}

fn tag(name: &str, colored: bool) -> String {
    paint(&format!("[{}]", name), Style::new().bright_cyan(), colored)
}

fn number() -> Style {
    Style::new().yellow()
}

fn dim() -> Style {
    Style::new().bright_black()
}

fn paint(text: &str, style: Style, colored: bool) -> String {
    if colored {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_cost(cost: f64, colored: bool) -> String {
    paint(&format!("{:.2}", cost), Style::new().bright_magenta().bold(), colored)
}

fn format_elapsed(ms: u64) -> String {
    format!("{:>5}.{:03}", ms / 1000, ms % 1000)
}

fn format_seconds(secs: f64) -> String {
    format_duration_ms((secs.max(0.0) * 1000.0).round() as u64)
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
