use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    keyboard::{KeyCode, PhysicalKey},
};
use std::sync::Arc;
use std::time::Instant;

mod camera;
mod clock;
mod config;
mod error;
mod fragment;
mod mesh;
mod motion;
mod pipeline;
mod shader;
mod state;
mod transform;
mod uniforms;
mod vertex;
mod wave;
use state::{GpuContext, RenderState};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let render_config = config::RenderConfig::load()?;
    let profile = render_config.profile()?;
    log::info!("profile {:?}, vsync {}, time scale {}", profile, render_config.vsync, render_config.time_scale);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let window = Arc::new(WindowBuilder::new().with_title(config::WINDOW_TITLE).build(&event_loop)?);

    let ctx = pollster::block_on(GpuContext::new(window.clone(), render_config.present_mode()))?;
    let mut state = RenderState::new(ctx, profile, render_config.time_scale)?;
    let mut last_fps_print = Instant::now();
    let mut frames = 0;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::KeyboardInput { event: KeyEvent { physical_key: PhysicalKey::Code(KeyCode::Escape), state: ElementState::Pressed, .. }, .. } => elwt.exit(),
                WindowEvent::Resized(physical_size) => state.resize(*physical_size),
                WindowEvent::RedrawRequested => {
                    state.update();
                    match state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(state.size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("render error: {:?}", e),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // FPS Counter
                frames += 1;
                if last_fps_print.elapsed().as_secs_f32() >= 1.0 {
                    window.set_title(&format!("{} | FPS: {}", config::WINDOW_TITLE, frames));
                    frames = 0;
                    last_fps_print = Instant::now();
                }
                window.request_redraw();
            }
            _ => {}
        }
    })?;
    Ok(())
}
