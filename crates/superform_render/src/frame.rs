//! Per-frame planning
//!
//! The frame loop never reads the model directly. A model listener copies
//! each snapshot into a [`ParameterBlock`]; every frame [`FrameDriver`]
//! combines the latest block with the camera to produce a [`FramePlan`]
//! that the GPU side uploads and draws.

use std::cell::RefCell;
use std::rc::Rc;

use superform_core::{DrawMode, ShapeSnapshot};

use crate::camera::OrbitCamera;
use crate::pipeline::ShapeUniforms;

/// Lifecycle of the render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Buffers and programs are not ready; frames are skipped
    #[default]
    Initializing,
    /// Every frame is drawn
    Running,
}

/// Model values staged for upload, refreshed by the model listener
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBlock {
    /// Shape and color uniforms; matrices are filled in per frame
    pub uniforms: ShapeUniforms,
    pub draw_mode: DrawMode,
    pub auto_rotate: bool,
    /// Normalized background RGB
    pub background: [f32; 3],
}

impl ParameterBlock {
    /// Stage `snapshot` for a mesh whose positions scale by `domain_scale`
    pub fn from_snapshot(snapshot: &ShapeSnapshot, domain_scale: f32) -> Self {
        let mut block = Self {
            uniforms: ShapeUniforms {
                domain_scale,
                ..ShapeUniforms::default()
            },
            draw_mode: snapshot.rendering.draw_mode,
            auto_rotate: snapshot.rendering.auto_rotate,
            background: snapshot.rendering.background_rgb(),
        };
        block.update(snapshot);
        block
    }

    /// Copy every model value; the domain scale and matrices are kept
    pub fn update(&mut self, snapshot: &ShapeSnapshot) {
        let (a, b) = (&snapshot.shape_a, &snapshot.shape_b);
        let u = &mut self.uniforms;

        u.color = snapshot.rendering.color_rgba();
        u.point_size = snapshot.rendering.point_size;
        u.m = [a.m, b.m];
        u.n1 = [a.n1, b.n1];
        u.n2 = [a.n2, b.n2];
        u.n3 = [a.n3, b.n3];
        u.a = [a.a, b.a];
        u.b = [a.b, b.b];
        u.scale = [a.scale, b.scale];
        u.shape_a_morph = snapshot.morph.shape_a;
        u.shape_b_morph = snapshot.morph.shape_b;
        u.shape_morph = snapshot.morph.shape;
        u.type_morph = snapshot.morph.shape_type;

        self.draw_mode = snapshot.rendering.draw_mode;
        self.auto_rotate = snapshot.rendering.auto_rotate;
        self.background = snapshot.rendering.background_rgb();
    }
}

/// Parameter block shared between the model listener and the frame loop
pub type SharedParameters = Rc<RefCell<ParameterBlock>>;

/// Model listener that keeps `shared` current.
///
/// Register it with `ShapeModel::subscribe`; the priming call fills the
/// block before the first frame.
pub fn parameter_listener(shared: &SharedParameters) -> impl FnMut(&ShapeSnapshot) + 'static {
    let shared = shared.clone();
    move |snapshot| shared.borrow_mut().update(snapshot)
}

/// Everything one frame uploads and draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    pub uniforms: ShapeUniforms,
    pub draw_mode: DrawMode,
    pub clear_color: wgpu::Color,
}

/// Drives the camera and produces one plan per frame
#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: PipelineState,
    camera: OrbitCamera,
    clear_alpha: f64,
}

impl FrameDriver {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            state: PipelineState::Initializing,
            camera,
            clear_alpha: 1.0,
        }
    }

    /// Alpha of the per-frame clear color, clamped to `[0, 1]`
    pub fn with_clear_alpha(mut self, alpha: f32) -> Self {
        self.clear_alpha = alpha.clamp(0.0, 1.0) as f64;
        self
    }

    /// Mark buffers and programs ready
    pub fn begin_running(&mut self) {
        if self.state != PipelineState::Running {
            log::info!("Render pipeline running");
        }
        self.state = PipelineState::Running;
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == PipelineState::Running
    }

    #[inline]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Plan the next frame from the current rotation angle.
    ///
    /// Returns `None` until the pipeline is running. The angle is left
    /// alone; call [`FrameDriver::frame_presented`] once the frame is shown.
    pub fn plan(&self, params: &ParameterBlock, aspect: f32) -> Option<FramePlan> {
        if !self.is_running() {
            return None;
        }

        let mut uniforms = params.uniforms;
        uniforms.projection_matrix = self.camera.projection_matrix(aspect);
        uniforms.model_view_matrix = self.camera.model_view_matrix();

        let [r, g, b] = params.background;
        Some(FramePlan {
            uniforms,
            draw_mode: params.draw_mode,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: self.clear_alpha,
            },
        })
    }

    /// Count a presented frame: rotation advances one step if auto-rotation is on
    pub fn frame_presented(&mut self, params: &ParameterBlock) {
        if self.is_running() {
            self.camera.advance(params.auto_rotate);
        }
    }

    /// Plan a frame and count it as presented straight away
    pub fn next_frame(&mut self, params: &ParameterBlock, aspect: f32) -> Option<FramePlan> {
        let plan = self.plan(params, aspect)?;
        self.frame_presented(params);
        Some(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_driver() -> FrameDriver {
        let mut driver = FrameDriver::new(OrbitCamera::new());
        driver.begin_running();
        driver
    }

    #[test]
    fn test_no_frames_while_initializing() {
        let mut driver = FrameDriver::new(OrbitCamera::new());
        let params = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 1.0);
        assert_eq!(driver.state(), PipelineState::Initializing);
        assert!(driver.next_frame(&params, 1.0).is_none());
        assert_eq!(driver.camera().rotation_angle(), 0.0);
    }

    #[test]
    fn test_rotation_accumulates_per_frame() {
        let mut driver = running_driver();
        let params = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 1.0);
        for _ in 0..200 {
            driver.next_frame(&params, 1.0);
        }
        assert!((driver.camera().rotation_angle() - 200.0 * 0.005).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_holds_without_auto_rotate() {
        let mut driver = running_driver();
        let mut snapshot = ShapeSnapshot::default();
        snapshot.rendering.auto_rotate = false;
        let params = ParameterBlock::from_snapshot(&snapshot, 1.0);

        let first = driver.next_frame(&params, 1.0).unwrap();
        let second = driver.next_frame(&params, 1.0).unwrap();
        assert_eq!(driver.camera().rotation_angle(), 0.0);
        assert_eq!(first.uniforms.model_view_matrix, second.uniforms.model_view_matrix);
    }

    #[test]
    fn test_first_frame_uses_unrotated_view() {
        let mut driver = running_driver();
        let params = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 1.0);
        let plan = driver.next_frame(&params, 1.0).unwrap();
        // Translation only: model origin 2 units in front of the eye
        assert_eq!(plan.uniforms.model_view_matrix[3], [0.0, 0.0, -2.0, 1.0]);
        assert_eq!(plan.uniforms.model_view_matrix[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_aspect_changes_projection_only() {
        let mut driver = running_driver();
        let mut snapshot = ShapeSnapshot::default();
        snapshot.rendering.auto_rotate = false;
        let params = ParameterBlock::from_snapshot(&snapshot, 1.0);

        let wide = driver.next_frame(&params, 2.0).unwrap();
        let square = driver.next_frame(&params, 1.0).unwrap();
        assert_eq!(wide.uniforms.projection_matrix[1][1], square.uniforms.projection_matrix[1][1]);
        assert!((wide.uniforms.projection_matrix[0][0] * 2.0 - square.uniforms.projection_matrix[0][0]).abs() < 1e-6);
        assert_eq!(wide.uniforms.m, square.uniforms.m);
    }

    #[test]
    fn test_parameter_block_copies_snapshot() {
        let mut snapshot = ShapeSnapshot::default();
        snapshot.shape_a.n1 = 7.0;
        snapshot.shape_b.scale = 0.5;
        snapshot.morph.shape_type = 0.25;
        snapshot.rendering.color = [255.0, 0.0, 51.0];
        snapshot.rendering.opacity = 0.8;
        snapshot.rendering.draw_mode = DrawMode::TriangleFan;

        let block = ParameterBlock::from_snapshot(&snapshot, 0.5);
        assert_eq!(block.uniforms.n1, [7.0, 1.0]);
        assert_eq!(block.uniforms.scale, [1.0, 0.5]);
        assert_eq!(block.uniforms.type_morph, 0.25);
        assert_eq!(block.uniforms.color, [1.0, 0.0, 0.2, 0.8]);
        assert_eq!(block.uniforms.domain_scale, 0.5);
        assert_eq!(block.draw_mode, DrawMode::TriangleFan);
    }

    #[test]
    fn test_update_keeps_domain_scale() {
        let mut block = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 0.25);
        block.update(&ShapeSnapshot::default());
        assert_eq!(block.uniforms.domain_scale, 0.25);
    }

    #[test]
    fn test_listener_feeds_next_frame() {
        let shared: SharedParameters = Rc::new(RefCell::new(ParameterBlock::from_snapshot(
            &ShapeSnapshot::default(),
            1.0,
        )));
        let mut listener = parameter_listener(&shared);

        let mut snapshot = ShapeSnapshot::default();
        snapshot.rendering.draw_mode = DrawMode::Lines;
        snapshot.rendering.background = [255.0, 0.0, 0.0];
        listener(&snapshot);

        let mut driver = running_driver().with_clear_alpha(0.5);
        let plan = driver.next_frame(&shared.borrow(), 1.0).unwrap();
        assert_eq!(plan.draw_mode, DrawMode::Lines);
        assert_eq!(plan.clear_color, wgpu::Color { r: 1.0, g: 0.0, b: 0.0, a: 0.5 });
    }

    #[test]
    fn test_dropped_frames_do_not_rotate() {
        let mut driver = running_driver();
        let params = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 1.0);

        // Planned but never presented, e.g. the surface was lost
        for _ in 0..5 {
            driver.plan(&params, 1.0).unwrap();
        }
        assert_eq!(driver.camera().rotation_angle(), 0.0);

        let first = driver.plan(&params, 1.0).unwrap();
        driver.frame_presented(&params);
        let second = driver.plan(&params, 1.0).unwrap();
        assert!((driver.camera().rotation_angle() - 0.005).abs() < 1e-6);
        assert_ne!(first.uniforms.model_view_matrix, second.uniforms.model_view_matrix);
    }

    #[test]
    fn test_presented_frame_ignored_while_initializing() {
        let mut driver = FrameDriver::new(OrbitCamera::new());
        let params = ParameterBlock::from_snapshot(&ShapeSnapshot::default(), 1.0);
        driver.frame_presented(&params);
        assert_eq!(driver.camera().rotation_angle(), 0.0);
    }
}
