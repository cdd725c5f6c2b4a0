use frontend::App;
use yew::Renderer;

fn main() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    log::info!("Starting {}", shared::constants::APP_TITLE);

    Renderer::<App>::new().render();
}
