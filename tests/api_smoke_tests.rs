use candle_chart::api::{ChartBootstrap, ConfigPatch, StaticHost, HostAdapter};
use candle_chart::core::{Viewport, samples_from_json};
use candle_chart::render::NullRenderer;
use candle_chart::viewport::{NavigationMode, WheelDirection};
use candle_chart::CandleChart;

const DATASET: &str = r#"[
  {"date": "2024-03-01", "open": 100.0, "high": 110.0, "low": 95.0, "close": 108.0},
  {"date": "2024-03-02", "open": 108.0, "high": 112.0, "low": 101.0, "close": 103.0,
   "short": 107.0, "sl": 113.0, "tp": 96.0},
  {"date": "2024-03-03", "open": 103.0, "high": 109.0, "low": 99.0, "close": 107.0},
  {"date": "2024-03-05", "open": 107.0, "high": 118.0, "low": 106.0, "close": 116.0,
   "long": 108.0, "sl": 102.0, "tp": 120.0}
]"#;

#[test]
fn engine_smoke_flow() {
    let samples = samples_from_json(DATASET).expect("parse dataset");
    assert_eq!(samples.len(), 4);

    let bootstrap = ChartBootstrap {
        viewport: Viewport::new(1000, 600),
        samples,
        host_id: "smoke-chart".to_owned(),
    };
    let mut chart = CandleChart::new(NullRenderer::default(), bootstrap).expect("chart init");
    assert_eq!(chart.host_id(), "smoke-chart");

    // The minimum gap is one day even though one two-day hole exists.
    assert_eq!(chart.spacing(), 86_400.0);

    chart.draw().expect("initial draw");
    assert_eq!(chart.visible_samples().len(), 4);

    // Pixel mapping round-trips within tolerance.
    let view = chart.view();
    let mid = (view.range.start() + view.range.end()) / 2.0;
    let px = chart.time_to_pixel(mid).expect("to pixel");
    let back = chart.pixel_to_time(px).expect("from pixel");
    assert!((back - mid).abs() <= 1e-6);

    // Pan drag: live commit while the button is held.
    chart.pointer_down(500.0).expect("down");
    chart.pointer_move(600.0, 120.0).expect("move");
    chart.pointer_up(600.0).expect("up");
    let panned = chart.view();
    assert!(panned.range.start() < view.range.start());
    assert_eq!(panned.zoom_factor, 1.0);

    // Wheel zoom shrinks the window and bumps the factor.
    chart.wheel(WheelDirection::In, 480.0).expect("wheel");
    let zoomed = chart.view();
    assert!(zoomed.range.span() < panned.range.span());
    assert!(zoomed.zoom_factor > 1.0);

    // Box zoom commits the selected range.
    chart.set_mode(NavigationMode::ZoomBox).expect("mode");
    chart.pointer_down(100.0).expect("down");
    chart.pointer_move(300.0, 100.0).expect("move");
    chart.pointer_up(300.0).expect("up");
    let boxed = chart.view();
    assert!(boxed.range.span() < zoomed.range.span());

    // Runtime configuration is merge-applied.
    chart
        .set_config(ConfigPatch {
            decimal: Some(3),
            ..ConfigPatch::default()
        })
        .expect("config patch");
    assert_eq!(chart.config().decimal, 3);
    chart.draw().expect("redraw after config change");

    chart.destroy().expect("destroy");
    assert!(chart.scene().is_empty());
}

#[test]
fn host_adapter_supplies_size_and_pointer_transform() {
    let samples = samples_from_json(DATASET).expect("parse dataset");
    let bootstrap = ChartBootstrap {
        viewport: Viewport::new(1000, 600),
        samples,
        host_id: "hosted".to_owned(),
    };
    let mut chart = CandleChart::new(NullRenderer::default(), bootstrap).expect("chart init");

    let host = StaticHost::new(Viewport::new(1280, 720))
        .with_offset(40.0, 20.0)
        .with_scale(0.5);

    let (local_x, local_y) = chart.pointer_from_host(&host, 240.0, 120.0);
    assert_eq!((local_x, local_y), (100.0, 50.0));
    assert_eq!(host.surface_size(), Viewport::new(1280, 720));

    chart.sync_host_size(&host).expect("resize from host");
    assert_eq!(chart.config().width, 1280);
    assert_eq!(chart.config().height, 720);
    chart.draw().expect("draw after resize");
}

#[test]
fn missing_optional_fields_deserialize_as_none() {
    let samples = samples_from_json(DATASET).expect("parse dataset");

    assert!(samples[0].long.is_none());
    assert!(samples[0].short.is_none());
    assert_eq!(samples[1].short, Some(107.0));
    assert_eq!(samples[1].sl, Some(113.0));
    assert_eq!(samples[3].long, Some(108.0));
}

#[test]
fn malformed_json_is_a_typed_error() {
    assert!(samples_from_json("not json").is_err());
    assert!(samples_from_json(r#"[{"date": "bad-date", "open": 1, "high": 1, "low": 1, "close": 1}]"#).is_err());
}
