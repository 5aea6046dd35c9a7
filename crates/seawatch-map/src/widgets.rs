//! Live overlay widgets.
//!
//! Each widget independently polls one metric source and renders an HTML
//! fragment into a named control slot on the drawing surface. The sensor
//! widget diff-skips renders when the payload is unchanged; the weather
//! widget re-renders every tick. A failed poll keeps whatever is currently
//! rendered, except that the very first render falls back to a placeholder so
//! the slot is never empty.

use crate::surface::MapSurface;
use chrono::Local;
use parking_lot::Mutex;
use seawatch_core::error::Result;
use seawatch_core::types::SensorReading;
use seawatch_feed::{SensorFeed, WeatherFeed};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Control slot id of the sensor legend.
pub const SENSOR_CONTROL_ID: &str = "sensor-legend";

/// Control slot id of the weather card.
pub const WEATHER_CONTROL_ID: &str = "weather-card";

/// Formats one sensor value, degrading to "--" for unusable numbers.
fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        "--".to_string()
    }
}

/// Renders the sensor legend fragment.
pub fn sensor_html(reading: &SensorReading) -> String {
    format!(
        concat!(
            "<div class=\"sensor-legend\">",
            "<div class=\"legend-title\">Data Sensor Real-time</div>",
            "<div class=\"sensor-card\">\u{1f321}\u{fe0f} Suhu: {} \u{b0}C</div>",
            "<div class=\"sensor-card\">\u{1f4a7} Kelembapan: {} %</div>",
            "<div class=\"sensor-card\">\u{1f4a8} Angin: {} m/s</div>",
            "<div class=\"sensor-card\">\u{1f50b} Baterai: {} %</div>",
            "</div>"
        ),
        format_value(reading.suhu),
        format_value(reading.kelembapan),
        format_value(reading.angin),
        format_value(reading.tegangan),
    )
}

/// Renders the sensor placeholder shown before any usable data arrives.
pub fn sensor_placeholder_html() -> String {
    concat!(
        "<div class=\"sensor-legend offline\">",
        "<div class=\"legend-title\">Data Sensor Real-time</div>",
        "<div class=\"sensor-card\">\u{1f321}\u{fe0f} Suhu: -- \u{b0}C</div>",
        "<div class=\"sensor-card\">\u{1f4a7} Kelembapan: -- %</div>",
        "<div class=\"sensor-card\">\u{1f4a8} Angin: -- m/s</div>",
        "<div class=\"sensor-card\">\u{1f50b} Baterai: -- %</div>",
        "</div>"
    )
    .to_string()
}

struct SensorState {
    last: Option<SensorReading>,
    rendered: bool,
}

/// Sensor readout controller.
pub struct SensorWidget {
    feed: Arc<dyn SensorFeed>,
    surface: Arc<dyn MapSurface>,
    anchor: String,
    poll_interval: Duration,
    state: Mutex<SensorState>,
    runner: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl SensorWidget {
    /// Creates the widget; [`start`](Self::start) arms the timer.
    pub fn new(
        feed: Arc<dyn SensorFeed>,
        surface: Arc<dyn MapSurface>,
        anchor: impl Into<String>,
        poll_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            feed,
            surface,
            anchor: anchor.into(),
            poll_interval,
            state: Mutex::new(SensorState {
                last: None,
                rendered: false,
            }),
            runner: Mutex::new(None),
        })
    }

    /// Performs one immediate poll-and-render, then re-polls on the interval.
    ///
    /// No-op when already started.
    pub fn start(self: &Arc<Self>) {
        let mut runner = self.runner.lock();
        if runner.is_some() {
            return;
        }
        let token = CancellationToken::new();
        let widget = Arc::clone(self);
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(widget.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            _ = task_token.cancelled() => break,
                            result = widget.feed.fetch_reading() => result,
                        };
                        if task_token.is_cancelled() {
                            break;
                        }
                        widget.apply(result);
                    }
                }
            }
        });
        *runner = Some((token, handle));
    }

    /// Cancels the timer and removes the control. Idempotent.
    pub async fn stop(&self) {
        let runner = self.runner.lock().take();
        if let Some((token, handle)) = runner {
            token.cancel();
            let _ = handle.await;
            self.surface.remove_control(SENSOR_CONTROL_ID);
        }
    }

    /// Applies one poll result to the rendered state.
    fn apply(&self, result: Result<SensorReading>) {
        let mut state = self.state.lock();
        match result {
            Ok(reading) if reading.is_complete() => {
                if state.rendered && state.last == Some(reading) {
                    debug!("sensor reading unchanged, skipping render");
                    return;
                }
                self.surface
                    .set_control(&self.anchor, SENSOR_CONTROL_ID, &sensor_html(&reading));
                state.last = Some(reading);
                state.rendered = true;
            }
            Ok(_) => {
                warn!("sensor reading incomplete, rendering placeholder");
                if state.rendered && state.last.is_none() {
                    return;
                }
                self.surface
                    .set_control(&self.anchor, SENSOR_CONTROL_ID, &sensor_placeholder_html());
                state.last = None;
                state.rendered = true;
            }
            Err(e) => {
                warn!(error = %e, "sensor poll failed");
                if !state.rendered {
                    self.surface
                        .set_control(&self.anchor, SENSOR_CONTROL_ID, &sensor_placeholder_html());
                    state.rendered = true;
                }
            }
        }
    }
}

/// One weather classification rule: keyword, display label, icon.
///
/// `None` labels pass the raw category through verbatim. Order matters:
/// the first matching keyword wins.
const WEATHER_RULES: &[(&str, Option<&str>, &str)] = &[
    ("cerah", Some("Cerah"), "\u{2600}\u{fe0f}"),
    ("berawan", Some("Berawan"), "\u{26c5}"),
    ("mendung", Some("Mendung"), "\u{2601}\u{fe0f}"),
    ("hujan", Some("Hujan"), "\u{1f327}\u{fe0f}"),
    ("badai", Some("Badai"), "\u{26c8}\u{fe0f}"),
    ("kabut", Some("Berkabut"), "\u{1f32b}\u{fe0f}"),
    ("panas", Some("Panas"), "\u{1f525}"),
    ("dingin", Some("Dingin"), "\u{2744}\u{fe0f}"),
    ("salju", None, "\u{1f328}\u{fe0f}"),
    ("angin", None, "\u{1f4a8}"),
    ("normal", Some("Normal"), "\u{1f324}\u{fe0f}"),
];

/// Icon used when no rule matches.
const DEFAULT_WEATHER_ICON: &str = "\u{1f324}\u{fe0f}";

/// Classifies a free-text weather category into a display label and icon.
///
/// Unmatched text passes through verbatim as the label.
pub fn classify_weather(category: &str) -> (String, &'static str) {
    let lower = category.to_lowercase();
    for &(keyword, label, icon) in WEATHER_RULES {
        if lower.contains(keyword) {
            let label = label.map(str::to_string).unwrap_or_else(|| category.to_string());
            return (label, icon);
        }
    }
    (category.to_string(), DEFAULT_WEATHER_ICON)
}

/// Renders the weather card fragment.
pub fn weather_html(category: &str, updated_at: &str) -> String {
    let (label, icon) = classify_weather(category);
    format!(
        concat!(
            "<div class=\"weather-card\">",
            "<div class=\"weather-header\">{} Cuaca Saat Ini <span class=\"weather-status\">{}</span></div>",
            "<div class=\"weather-footer\">Update terakhir: {} <span class=\"weather-category\">{}</span></div>",
            "</div>"
        ),
        icon, label, updated_at, category,
    )
}

/// Renders the weather placeholder shown before any data arrives.
pub fn weather_placeholder_html() -> String {
    concat!(
        "<div class=\"weather-card offline\">",
        "<div class=\"weather-header\">\u{1f324}\u{fe0f} Cuaca Saat Ini <span class=\"weather-status\">Loading...</span></div>",
        "<div class=\"weather-footer\">Menunggu data... <span class=\"weather-category\">Offline</span></div>",
        "</div>"
    )
    .to_string()
}

/// Weather readout controller. Always re-renders on a successful poll.
pub struct WeatherWidget {
    feed: Arc<dyn WeatherFeed>,
    surface: Arc<dyn MapSurface>,
    anchor: String,
    poll_interval: Duration,
    rendered: Mutex<bool>,
    runner: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl WeatherWidget {
    /// Creates the widget; [`start`](Self::start) arms the timer.
    pub fn new(
        feed: Arc<dyn WeatherFeed>,
        surface: Arc<dyn MapSurface>,
        anchor: impl Into<String>,
        poll_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            feed,
            surface,
            anchor: anchor.into(),
            poll_interval,
            rendered: Mutex::new(false),
            runner: Mutex::new(None),
        })
    }

    /// Performs one immediate poll-and-render, then re-polls on the interval.
    ///
    /// No-op when already started.
    pub fn start(self: &Arc<Self>) {
        let mut runner = self.runner.lock();
        if runner.is_some() {
            return;
        }
        let token = CancellationToken::new();
        let widget = Arc::clone(self);
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(widget.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            _ = task_token.cancelled() => break,
                            result = widget.feed.fetch_report() => result,
                        };
                        if task_token.is_cancelled() {
                            break;
                        }
                        widget.apply(result.map(|r| r.kategori_cuaca));
                    }
                }
            }
        });
        *runner = Some((token, handle));
    }

    /// Cancels the timer and removes the control. Idempotent.
    pub async fn stop(&self) {
        let runner = self.runner.lock().take();
        if let Some((token, handle)) = runner {
            token.cancel();
            let _ = handle.await;
            self.surface.remove_control(WEATHER_CONTROL_ID);
        }
    }

    /// Applies one poll result to the rendered state.
    fn apply(&self, result: Result<String>) {
        let mut rendered = self.rendered.lock();
        match result {
            Ok(category) => {
                let updated_at = Local::now().format("%H:%M:%S").to_string();
                self.surface.set_control(
                    &self.anchor,
                    WEATHER_CONTROL_ID,
                    &weather_html(&category, &updated_at),
                );
                *rendered = true;
            }
            Err(e) => {
                warn!(error = %e, "weather poll failed");
                if !*rendered {
                    self.surface.set_control(
                        &self.anchor,
                        WEATHER_CONTROL_ID,
                        &weather_placeholder_html(),
                    );
                    *rendered = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use async_trait::async_trait;
    use seawatch_core::error::FeedError;
    use seawatch_core::types::WeatherReport;

    struct StaticSensor(SensorReading);

    #[async_trait]
    impl SensorFeed for StaticSensor {
        async fn fetch_reading(&self) -> Result<SensorReading> {
            Ok(self.0)
        }
    }

    fn reading() -> SensorReading {
        SensorReading {
            suhu: 30.0,
            kelembapan: 60.0,
            angin: 5.0,
            tegangan: 90.0,
        }
    }

    fn sensor_widget(surface: Arc<RecordingSurface>) -> Arc<SensorWidget> {
        SensorWidget::new(
            Arc::new(StaticSensor(reading())),
            surface,
            "bottom-left",
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_sensor_diff_skip() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = sensor_widget(surface.clone());

        widget.apply(Ok(reading()));
        widget.apply(Ok(reading()));
        assert_eq!(surface.control_render_count(SENSOR_CONTROL_ID), 1);

        let mut changed = reading();
        changed.suhu = 31.0;
        widget.apply(Ok(changed));
        assert_eq!(surface.control_render_count(SENSOR_CONTROL_ID), 2);
    }

    #[test]
    fn test_sensor_incomplete_reading_renders_placeholder() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = sensor_widget(surface.clone());

        let mut broken = reading();
        broken.angin = f64::NAN;
        widget.apply(Ok(broken));

        let html = surface.control_html(SENSOR_CONTROL_ID).unwrap();
        assert!(html.contains("-- \u{b0}C"));
        assert!(html.contains("-- m/s"));
    }

    #[test]
    fn test_sensor_failure_keeps_previous_render() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = sensor_widget(surface.clone());

        widget.apply(Ok(reading()));
        widget.apply(Err(FeedError::status("http://x", 500).into()));

        assert_eq!(surface.control_render_count(SENSOR_CONTROL_ID), 1);
        let html = surface.control_html(SENSOR_CONTROL_ID).unwrap();
        assert!(html.contains("30.0"));
    }

    #[test]
    fn test_sensor_first_failure_renders_placeholder() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = sensor_widget(surface.clone());

        widget.apply(Err(FeedError::status("http://x", 500).into()));
        let html = surface.control_html(SENSOR_CONTROL_ID).unwrap();
        assert!(html.contains("--"));
    }

    #[test]
    fn test_weather_classification_first_match_wins() {
        // "cerah" is checked before "berawan"
        let (label, icon) = classify_weather("Cerah Berawan");
        assert_eq!(label, "Cerah");
        assert_eq!(icon, "\u{2600}\u{fe0f}");
    }

    #[test]
    fn test_weather_classification_case_insensitive() {
        let (label, _) = classify_weather("HUJAN LEBAT");
        assert_eq!(label, "Hujan");
    }

    #[test]
    fn test_weather_unmatched_passes_through() {
        let (label, icon) = classify_weather("Gerimis Misterius");
        assert_eq!(label, "Gerimis Misterius");
        assert_eq!(icon, DEFAULT_WEATHER_ICON);
    }

    #[test]
    fn test_weather_iconic_only_rules_pass_label_through() {
        let (label, icon) = classify_weather("Salju Tipis");
        assert_eq!(label, "Salju Tipis");
        assert_eq!(icon, "\u{1f328}\u{fe0f}");
    }

    #[test]
    fn test_weather_always_rerenders() {
        struct StaticWeather;

        #[async_trait]
        impl WeatherFeed for StaticWeather {
            async fn fetch_report(&self) -> Result<WeatherReport> {
                Ok(WeatherReport {
                    kategori_cuaca: "Cerah".to_string(),
                })
            }
        }

        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = WeatherWidget::new(
            Arc::new(StaticWeather),
            surface.clone(),
            "top-right",
            Duration::from_secs(10),
        );

        widget.apply(Ok("Cerah".to_string()));
        widget.apply(Ok("Cerah".to_string()));
        assert_eq!(surface.control_render_count(WEATHER_CONTROL_ID), 2);
    }

    #[test]
    fn test_weather_failure_before_data_renders_placeholder() {
        struct FailingWeather;

        #[async_trait]
        impl WeatherFeed for FailingWeather {
            async fn fetch_report(&self) -> Result<WeatherReport> {
                Err(FeedError::status("http://x", 502).into())
            }
        }

        let surface = Arc::new(RecordingSurface::new(9.0));
        let widget = WeatherWidget::new(
            Arc::new(FailingWeather),
            surface.clone(),
            "top-right",
            Duration::from_secs(10),
        );

        widget.apply(Err(FeedError::status("http://x", 502).into()));
        let html = surface.control_html(WEATHER_CONTROL_ID).unwrap();
        assert!(html.contains("Menunggu data"));

        // Data arriving later replaces the placeholder
        widget.apply(Ok("Mendung".to_string()));
        let html = surface.control_html(WEATHER_CONTROL_ID).unwrap();
        assert!(html.contains("Mendung"));
    }
}
