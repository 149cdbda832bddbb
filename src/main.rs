use winit::event_loop::{ControlFlow, EventLoop};

use automata_gpu::engine::EngineConfig;
use automata_gpu::window::App;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(EngineConfig::default());
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {}", e);
    }
}
