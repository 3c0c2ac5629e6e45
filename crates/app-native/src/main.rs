use std::path::Path;
use std::time::Instant;

use winit::{
    dpi::LogicalSize,
    event::{Event, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod app;
mod meshes;
mod overlay;
mod render;
mod textures;

use app::App;
use app_core::{ProgramSettings, WINDOW_HEIGHT, WINDOW_WIDTH};

const SETTINGS_PATH: &str = "program_state.txt";

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings = ProgramSettings::load_or_default(Path::new(SETTINGS_PATH));

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("nightwood")
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .expect("window");

    let mut app = App::new(settings);
    app.apply_cursor_mode(&window);

    let mut gpu = pollster::block_on(render::GpuState::new(&window)).expect("gpu");

    let start = Instant::now();
    let mut last_frame = Instant::now();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => gpu.resize(size),
                WindowEvent::CloseRequested => {
                    app.save_settings(Path::new(SETTINGS_PATH));
                    elwt.exit();
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if app.handle_key(&key_event, gpu.window) {
                        app.save_settings(Path::new(SETTINGS_PATH));
                        elwt.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.handle_cursor(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let dy = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                    };
                    app.handle_scroll(dy);
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32();
                last_frame = now;
                let time_sec = start.elapsed().as_secs_f64();

                app.update(dt, time_sec);
                let plan = app.frame_plan(gpu.aspect());
                match gpu.render(&plan) {
                    Ok(()) => gpu.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(err) => log::warn!("surface error: {err:?}"),
                }
            }
            _ => {}
        })
        .unwrap();
}
