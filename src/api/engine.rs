use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::trace;

use crate::api::config::{ChartConfig, ConfigPatch, ConfigView};
use crate::api::host::HostAdapter;
use crate::api::palette::{Palette, PalettePatch};
use crate::api::scene::{SceneContext, SceneGraph, build_scene};
use crate::core::{
    PriceScale, PriceScaleTuning, Sample, SampleSet, TimeRange, TimeScale, Viewport,
    candle_widths, samples_in_padded_window,
};
use crate::error::ChartResult;
use crate::interaction::{CrosshairState, InteractionState};
use crate::render::Renderer;
use crate::viewport::{
    GestureState, NavigationIntent, NavigationMode, ViewportEffect, ViewportMachine, ViewportState,
    WheelDirection,
};

/// Construction parameters for a chart instance.
#[derive(Debug, Clone)]
pub struct ChartBootstrap {
    pub viewport: Viewport,
    pub samples: Vec<Sample>,
    /// Identifier of the host container the chart is mounted in.
    pub host_id: String,
}

/// Main orchestration facade consumed by host applications.
///
/// Owns the dataset, configuration, viewport machine and crosshair state,
/// and rebuilds the scene through the renderer on every commit.
pub struct CandleChart<R: Renderer> {
    renderer: R,
    host_id: String,
    samples: SampleSet,
    config: ChartConfig,
    palette: Palette,
    machine: ViewportMachine,
    interaction: InteractionState,
    scene: SceneGraph,
    window: Vec<Sample>,
    zoom_overlay: Option<(f64, f64)>,
}

impl<R: Renderer> CandleChart<R> {
    /// Creates a chart over a dataset, initially zoomed to the full extent.
    pub fn new(renderer: R, bootstrap: ChartBootstrap) -> ChartResult<Self> {
        let samples = SampleSet::new(bootstrap.samples);
        let mut config = ChartConfig::new(bootstrap.viewport)?;
        config.recompute_derived(samples.max_high().unwrap_or(1.0))?;

        let full_range = dataset_range(&samples)?;
        let machine = ViewportMachine::new(full_range, config.derived().plot_width)?;

        let mut chart = Self {
            renderer,
            host_id: bootstrap.host_id,
            samples,
            config,
            palette: Palette::default(),
            machine,
            interaction: InteractionState::default(),
            scene: SceneGraph::default(),
            window: Vec::new(),
            zoom_overlay: None,
        };
        chart.refresh_window();
        Ok(chart)
    }

    #[must_use]
    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    #[must_use]
    pub fn view(&self) -> ViewportState {
        self.machine.view()
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.machine.gesture()
    }

    #[must_use]
    pub fn mode(&self) -> NavigationMode {
        self.machine.view().mode
    }

    #[must_use]
    pub fn crosshair_state(&self) -> CrosshairState {
        self.interaction.crosshair()
    }

    /// Samples inside the current padded zoom window.
    #[must_use]
    pub fn visible_samples(&self) -> &[Sample] {
        &self.window
    }

    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.samples.spacing()
    }

    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Rebuilds the whole scene from current state and hands it to the
    /// renderer.
    ///
    /// The previous scene is dropped first; handles issued by it stop
    /// resolving, so no stale element or hit region can survive a commit.
    pub fn draw(&mut self) -> ChartResult<()> {
        self.refresh_window();

        let time_scale = self.time_scale();
        let tuning = self.price_tuning();
        let price_scale = PriceScale::from_window_tuned(&self.window, tuning)?;
        let widths = candle_widths(
            &self.window,
            time_scale,
            self.samples.spacing(),
            self.config.derived().plot_width,
        )?;

        let ctx = SceneContext {
            config: &self.config,
            palette: &self.palette,
            window: &self.window,
            time_scale,
            price_scale,
            widths,
            crosshair: self.interaction.crosshair(),
            zoom_overlay: self.zoom_overlay,
        };
        let (frame, graph) = build_scene(&ctx)?;
        trace!(
            rects = frame.rects.len(),
            lines = frame.lines.len(),
            triangles = frame.triangles.len(),
            texts = frame.texts.len(),
            "render pass"
        );

        self.scene = graph;
        self.renderer.render(&frame)
    }

    /// Detaches all interactive regions and removes the rendered scene.
    pub fn destroy(&mut self) -> ChartResult<()> {
        self.scene.clear();
        self.interaction.on_pointer_leave();
        self.zoom_overlay = None;
        self.renderer.clear()
    }

    /// Switches between pan and zoom-box navigation; idle gestures only.
    pub fn set_mode(&mut self, mode: NavigationMode) -> ChartResult<()> {
        self.machine.apply(NavigationIntent::SetMode(mode))?;
        Ok(())
    }

    pub fn pointer_down(&mut self, x_px: f64) -> ChartResult<()> {
        let x = self.clamp_x(x_px);
        let effect = self.machine.apply(NavigationIntent::PointerDown { x_px: x })?;
        self.handle_effect(effect)
    }

    /// Pointer movement: crosshair/hover update plus gesture progress.
    pub fn pointer_move(&mut self, x_px: f64, y_px: f64) -> ChartResult<()> {
        let x = self.clamp_x(x_px);
        let y = self.clamp_y(y_px);
        self.interaction.on_pointer_move(x, y);
        match self.resolve_hover(x, y) {
            Some(time) => self.interaction.lock_to_sample(time),
            None => self.interaction.unlock(),
        }

        let effect = self.machine.apply(NavigationIntent::PointerMove { x_px: x })?;
        match effect {
            ViewportEffect::ZoomOverlay { from_px, to_px } => {
                self.zoom_overlay = Some((from_px, to_px));
            }
            ViewportEffect::Redraw => self.zoom_overlay = None,
            ViewportEffect::None => {}
        }
        // The crosshair moved even when the viewport did not, so every
        // pointer move ends in a full scene rebuild.
        self.draw()
    }

    pub fn pointer_up(&mut self, x_px: f64) -> ChartResult<()> {
        let x = self.clamp_x(x_px);
        let effect = self.machine.apply(NavigationIntent::PointerUp { x_px: x })?;
        self.zoom_overlay = None;
        self.handle_effect(effect)
    }

    /// Pointer left the plot: hides the crosshair and aborts any drag.
    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        self.interaction.on_pointer_leave();
        self.machine.apply(NavigationIntent::PointerLeave)?;
        self.zoom_overlay = None;
        self.draw()
    }

    pub fn wheel(&mut self, direction: WheelDirection, x_px: f64) -> ChartResult<()> {
        let x = self.clamp_x(x_px);
        let effect = self
            .machine
            .apply(NavigationIntent::Wheel { direction, x_px: x })?;
        self.handle_effect(effect)
    }

    /// Merge-applies a configuration patch and recomputes derived
    /// dimensions; the caller decides when to `draw`.
    pub fn set_config(&mut self, patch: ConfigPatch) -> ChartResult<()> {
        self.config
            .apply(patch, self.samples.max_high().unwrap_or(1.0))?;
        self.machine
            .set_plot_width(self.config.derived().plot_width)?;
        Ok(())
    }

    /// Merge-applies a palette patch; unspecified roles keep their colors.
    pub fn set_palette(&mut self, patch: PalettePatch) {
        self.palette.apply(patch);
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Restricted configuration subset exposed to hosts.
    #[must_use]
    pub fn config(&self) -> ConfigView {
        self.config.view()
    }

    /// Pulls the current surface size from the host and reflows.
    pub fn sync_host_size(&mut self, host: &impl HostAdapter) -> ChartResult<()> {
        let size = host.surface_size();
        self.set_config(ConfigPatch {
            width: Some(size.width),
            height: Some(size.height),
            ..ConfigPatch::default()
        })
    }

    /// Maps device pointer coordinates through the host transform.
    #[must_use]
    pub fn pointer_from_host(
        &self,
        host: &impl HostAdapter,
        device_x: f64,
        device_y: f64,
    ) -> (f64, f64) {
        host.to_plot_local(device_x, device_y)
    }

    pub fn time_to_pixel(&self, time: f64) -> ChartResult<f64> {
        self.time_scale()
            .time_to_pixel(time, self.config.derived().plot_width)
    }

    pub fn pixel_to_time(&self, x_px: f64) -> ChartResult<f64> {
        self.time_scale()
            .pixel_to_time(x_px, self.config.derived().plot_width)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn handle_effect(&mut self, effect: ViewportEffect) -> ChartResult<()> {
        match effect {
            ViewportEffect::Redraw => {
                self.zoom_overlay = None;
                self.draw()
            }
            ViewportEffect::ZoomOverlay { from_px, to_px } => {
                self.zoom_overlay = Some((from_px, to_px));
                self.draw()
            }
            ViewportEffect::None => Ok(()),
        }
    }

    /// Re-derives the filtered window from the current zoom range.
    fn refresh_window(&mut self) {
        self.window = samples_in_padded_window(
            self.samples.samples(),
            self.machine.view().range,
            self.samples.spacing(),
        );
    }

    fn time_scale(&self) -> TimeScale {
        TimeScale::from_range(self.machine.view().range)
    }

    fn price_tuning(&self) -> PriceScaleTuning {
        PriceScaleTuning {
            top_padding_fraction: self.config.y_padding_scale_top,
            bottom_padding_fraction: self.config.y_padding_scale_bottom,
            ..PriceScaleTuning::default()
        }
    }

    /// Nearest interactive region under the pointer, by center distance.
    fn resolve_hover(&self, x: f64, y: f64) -> Option<f64> {
        let mut candidates: SmallVec<[(OrderedFloat<f64>, usize); 4]> = SmallVec::new();
        for region in self.scene.hits_at(x, y) {
            candidates.push((
                OrderedFloat((region.center_x() - x).abs()),
                region.sample_index,
            ));
        }

        let (_, sample_index) = candidates.into_iter().min_by_key(|item| item.0)?;
        self.window.get(sample_index).map(|sample| sample.time)
    }

    fn clamp_x(&self, x_px: f64) -> f64 {
        x_px.clamp(0.0, self.config.derived().plot_width)
    }

    fn clamp_y(&self, y_px: f64) -> f64 {
        y_px.clamp(0.0, self.config.derived().plot_height)
    }
}

/// Zoomable extent of a dataset; empty or single-sample sets get a
/// half-second margin or a unit range so the machine always has a window.
fn dataset_range(samples: &SampleSet) -> ChartResult<TimeRange> {
    match samples.extent() {
        Some((start, end)) if start == end => TimeRange::new(start - 0.5, end + 0.5),
        Some((start, end)) => TimeRange::new(start, end),
        None => TimeRange::new(0.0, 1.0),
    }
}
