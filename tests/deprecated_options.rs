use once_cell::sync::Lazy;
use pinchmap::prelude::*;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// Keeps every log record with the thread it was logged on, so that tests
/// running in parallel only see their own warnings
struct CaptureLogger;

static RECORDS: Lazy<Mutex<Vec<(ThreadId, log::Level, String)>>> = Lazy::new(Default::default);
static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Lazy<()> = Lazy::new(|| {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
});

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Warnings logged by this thread while running `f`
fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    Lazy::force(&INSTALL);
    let me = thread::current().id();
    RECORDS.lock().unwrap().retain(|(thread, ..)| *thread != me);

    let value = f();

    let warnings = RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, level, _)| *thread == me && *level == log::Level::Warn)
        .map(|(_, _, message)| message.clone())
        .collect();
    (value, warnings)
}

fn build(touch_zoom: Option<bool>, pinch_zoom: Option<bool>) -> (Map, Vec<String>) {
    warnings_during(|| {
        Map::new(MapOptions {
            touch_zoom,
            pinch_zoom,
            ..Default::default()
        })
        .unwrap()
    })
}

#[cfg(test)]
mod deprecated_option_tests {
    use super::*;

    /// `touchZoom: false` alone switches pinch zoom off and warns once
    #[test]
    fn test_touch_zoom_false_disables_pinch_zoom() {
        let (map, warnings) = build(Some(false), None);

        assert!(!map.pinch_zoom().enabled());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pinchZoom"));
        assert_eq!(warnings[0], TOUCH_ZOOM_DEPRECATION);
    }

    /// Both options enabled: same single warning, pinch zoom stays on
    #[test]
    fn test_both_options_enabled() {
        let (map, warnings) = build(Some(true), Some(true));

        assert!(map.pinch_zoom().enabled());
        assert_eq!(warnings, vec![TOUCH_ZOOM_DEPRECATION.to_string()]);
    }

    /// On conflict the deprecated option decides
    #[test]
    fn test_touch_zoom_wins_conflicts() {
        let (map, warnings) = build(Some(false), Some(true));
        assert!(!map.pinch_zoom().enabled());
        assert_eq!(warnings.len(), 1);

        let (map, warnings) = build(Some(true), Some(false));
        assert!(map.pinch_zoom().enabled());
        assert_eq!(warnings.len(), 1);
    }

    /// Only the new option: no warning
    #[test]
    fn test_pinch_zoom_alone_is_silent() {
        let (map, warnings) = build(None, Some(false));
        assert!(!map.pinch_zoom().enabled());
        assert!(warnings.is_empty());

        let (map, warnings) = build(None, None);
        assert!(map.pinch_zoom().enabled());
        assert!(warnings.is_empty());
    }

    /// The warning is logged per map, not per options value
    #[test]
    fn test_warning_once_per_construction() {
        let options = MapOptions {
            touch_zoom: Some(true),
            ..Default::default()
        };

        let (_, warnings) = warnings_during(|| {
            let _first = Map::new(options.clone()).unwrap();
            let _second = Map::new(options.clone()).unwrap();
        });

        assert_eq!(warnings.len(), 2);
    }

    /// JSON options use the JavaScript names and parsing alone never warns
    #[test]
    fn test_json_touch_zoom() {
        let (options, warnings) =
            warnings_during(|| MapOptions::from_json(r#"{"touchZoom": false, "zoom": 3}"#).unwrap());
        assert!(warnings.is_empty());
        assert_eq!(options.touch_zoom, Some(false));

        let (map, warnings) = warnings_during(|| Map::new(options).unwrap());
        assert!(!map.pinch_zoom().enabled());
        assert_eq!(map.zoom(), 3.0);
        assert_eq!(warnings.len(), 1);
    }

    /// A map built with `touchZoom: false` ignores two-finger gestures
    #[test]
    fn test_disabled_map_ignores_pinch() {
        let (mut map, _) = build(Some(false), None);
        let now = Instant::now();

        map.handle_pointer(PointerEvent::down(1, Point::new(375.0, 300.0), now));
        map.handle_pointer(PointerEvent::down(2, Point::new(425.0, 300.0), now));
        map.handle_pointer(PointerEvent::moved(1, Point::new(200.0, 300.0), now));
        map.handle_pointer(PointerEvent::moved(2, Point::new(600.0, 300.0), now));
        map.handle_pointer(PointerEvent::up(1, Point::new(200.0, 300.0), now));

        assert!(!map.pinch_zoom().is_active());
        assert_eq!(map.zoom(), 0.0);
    }

    /// The resolution itself is a pure function
    #[test]
    fn test_resolve_pinch_zoom() {
        assert!(resolve_pinch_zoom(None, None).enabled);
        assert_eq!(resolve_pinch_zoom(None, None).warning, None);
        assert!(!resolve_pinch_zoom(Some(false), Some(true)).enabled);
        assert_eq!(
            resolve_pinch_zoom(Some(true), None).warning,
            Some(TOUCH_ZOOM_DEPRECATION)
        );
    }
}
