//! Top-level map session.
//!
//! Owns the drawing surface, the reconcilers, the widgets, and every timer.
//! `start` arms four independent pollers plus the zoom subscription; `shutdown`
//! cancels all of them before any further tick can apply, and removes the
//! controls the session added to the surface.

use crate::layers::{FixedLayerReconciler, FixedPositions, LayerKind, ShipLayerReconciler};
use crate::surface::MapSurface;
use crate::widgets::{SensorWidget, WeatherWidget};
use crate::zoom::ZoomReactor;
use parking_lot::Mutex;
use seawatch_core::config::AppConfig;
use seawatch_feed::{SensorFeed, VesselFeed, WeatherFeed};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The assembled live map: feeds, reconcilers, widgets, and their timers.
pub struct MapSession {
    surface: Arc<dyn MapSurface>,
    vessels: Arc<dyn VesselFeed>,
    ships: Arc<ShipLayerReconciler>,
    buoys: Arc<FixedLayerReconciler>,
    stations: Arc<FixedLayerReconciler>,
    sensor: Arc<SensorWidget>,
    weather: Arc<WeatherWidget>,
    ship_interval: Duration,
    fixed_interval: Duration,
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    started: AtomicBool,
}

impl MapSession {
    /// Wires a session over the given surface and feeds.
    pub fn new(
        surface: Arc<dyn MapSurface>,
        vessels: Arc<dyn VesselFeed>,
        sensor_feed: Arc<dyn SensorFeed>,
        weather_feed: Arc<dyn WeatherFeed>,
        config: &AppConfig,
    ) -> Self {
        let fixed = FixedPositions::new();
        let ships = Arc::new(ShipLayerReconciler::new(
            Arc::clone(&surface),
            fixed.clone(),
            config.map.suppression_radius_m,
        ));
        let buoys = Arc::new(FixedLayerReconciler::new(
            LayerKind::Buoys,
            Arc::clone(&surface),
            fixed.clone(),
        ));
        let stations = Arc::new(FixedLayerReconciler::new(
            LayerKind::Stations,
            Arc::clone(&surface),
            fixed,
        ));
        let sensor = SensorWidget::new(
            sensor_feed,
            Arc::clone(&surface),
            config.widgets.sensor_anchor.clone(),
            config.widgets.sensor_interval(),
        );
        let weather = WeatherWidget::new(
            weather_feed,
            Arc::clone(&surface),
            config.widgets.weather_anchor.clone(),
            config.widgets.weather_interval(),
        );

        Self {
            surface,
            vessels,
            ships,
            buoys,
            stations,
            sensor,
            weather,
            ship_interval: config.feeds.ship_interval(),
            fixed_interval: config.feeds.fixed_interval(),
            token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Starts every poller and the zoom subscription. No-op when already
    /// started.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(
            ship_interval_secs = self.ship_interval.as_secs(),
            fixed_interval_secs = self.fixed_interval.as_secs(),
            "starting map session"
        );

        let mut tasks = self.tasks.lock();
        tasks.push(self.spawn_ship_poller());
        tasks.push(self.spawn_fixed_poller());
        tasks.push(self.spawn_zoom_reactor());
        self.sensor.start();
        self.weather.start();
    }

    fn spawn_ship_poller(&self) -> JoinHandle<()> {
        let vessels = Arc::clone(&self.vessels);
        let ships = Arc::clone(&self.ships);
        let surface = Arc::clone(&self.surface);
        let token = self.token.clone();
        let period = self.ship_interval;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            _ = token.cancelled() => break,
                            result = vessels.fetch_ships() => result,
                        };
                        if token.is_cancelled() {
                            break;
                        }
                        match result {
                            Ok(entities) => ships.reconcile(&entities, surface.zoom()),
                            Err(e) => warn!(layer = "ships", error = %e, "poll failed, keeping previous markers"),
                        }
                    }
                }
            }
        })
    }

    fn spawn_fixed_poller(&self) -> JoinHandle<()> {
        let vessels = Arc::clone(&self.vessels);
        let buoys = Arc::clone(&self.buoys);
        let stations = Arc::clone(&self.stations);
        let surface = Arc::clone(&self.surface);
        let token = self.token.clone();
        let period = self.fixed_interval;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            _ = token.cancelled() => break,
                            result = vessels.fetch_buoys() => result,
                        };
                        if token.is_cancelled() {
                            break;
                        }
                        match result {
                            Ok(entities) => buoys.reconcile(&entities, surface.zoom()),
                            Err(e) => warn!(layer = "buoys", error = %e, "poll failed, keeping previous markers"),
                        }

                        let result = tokio::select! {
                            _ = token.cancelled() => break,
                            result = vessels.fetch_stations() => result,
                        };
                        if token.is_cancelled() {
                            break;
                        }
                        match result {
                            Ok(entities) => stations.reconcile(&entities, surface.zoom()),
                            Err(e) => warn!(layer = "stations", error = %e, "poll failed, keeping previous markers"),
                        }
                    }
                }
            }
        })
    }

    fn spawn_zoom_reactor(&self) -> JoinHandle<()> {
        let reactor = ZoomReactor::new(Arc::clone(&self.ships));
        let zoom_rx = self.surface.zoom_changes();
        let token = self.token.clone();
        tokio::spawn(reactor.run(zoom_rx, token))
    }

    /// Tears the session down: cancels every timer and subscription, then
    /// removes the widget controls.
    ///
    /// Safe to call at any point: before `start`, after a partial startup, or
    /// repeatedly. No tick callback applies its result once this begins.
    pub async fn shutdown(&self) {
        self.token.cancel();

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            let _ = task.await;
        }

        self.sensor.stop().await;
        self.weather.stop().await;
        info!("map session stopped");
    }

    /// Markers currently owned by the ship layer.
    pub fn ship_marker_count(&self) -> usize {
        self.ships.marker_count()
    }

    /// Markers currently owned by the fixed layers.
    pub fn fixed_marker_count(&self) -> usize {
        self.buoys.marker_count() + self.stations.marker_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use async_trait::async_trait;
    use seawatch_core::error::{FeedError, Result};
    use seawatch_core::types::{
        Position, SensorReading, VesselCategory, VesselRecord, WeatherReport,
    };

    struct StaticFeeds;

    #[async_trait]
    impl VesselFeed for StaticFeeds {
        async fn fetch_ships(&self) -> Result<Vec<VesselRecord>> {
            let mut ship = VesselRecord::new("mmsi:1", "PACIFIC CREST", VesselCategory::Cargo);
            ship.position = Position::new(-7.25, 112.72);
            Ok(vec![ship])
        }

        async fn fetch_buoys(&self) -> Result<Vec<VesselRecord>> {
            let mut buoy = VesselRecord::new("aton:1", "BUOY MERAH 1", VesselCategory::Buoy);
            buoy.position = Position::new(-7.19, 112.68);
            Ok(vec![buoy])
        }

        async fn fetch_stations(&self) -> Result<Vec<VesselRecord>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl SensorFeed for StaticFeeds {
        async fn fetch_reading(&self) -> Result<SensorReading> {
            Ok(SensorReading {
                suhu: 30.0,
                kelembapan: 60.0,
                angin: 5.0,
                tegangan: 90.0,
            })
        }
    }

    #[async_trait]
    impl WeatherFeed for StaticFeeds {
        async fn fetch_report(&self) -> Result<WeatherReport> {
            Err(FeedError::status("http://x", 500).into())
        }
    }

    fn session(surface: Arc<RecordingSurface>) -> MapSession {
        let feeds = Arc::new(StaticFeeds);
        MapSession::new(
            surface,
            feeds.clone(),
            feeds.clone(),
            feeds,
            &AppConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_ticks_populate_layers_and_controls() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let session = session(surface.clone());

        session.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(session.ship_marker_count(), 1);
        assert_eq!(session.fixed_marker_count(), 1);
        // Sensor rendered its reading, weather fell back to the placeholder
        assert_eq!(
            surface.control_render_count(crate::widgets::SENSOR_CONTROL_ID),
            1
        );
        assert!(surface
            .control_html(crate::widgets::WEATHER_CONTROL_ID)
            .unwrap()
            .contains("Menunggu data"));

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let session = session(surface.clone());

        session.start();
        session.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // A second start must not double the pollers
        assert_eq!(session.ship_marker_count(), 1);
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_start_is_safe() {
        let surface = Arc::new(RecordingSurface::new(9.0));
        let session = session(surface);
        session.shutdown().await;
        session.shutdown().await;
    }
}
