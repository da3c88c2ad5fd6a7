use clap::Parser;
use wasm_bindgen::prelude::*;

mod app;
mod board;
mod identity;
mod presentation;
mod remote;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Base path of the minesweeper service
    #[arg(long, default_value = "/api/minesweeper")]
    api_base: String,

    /// Base path of the tile images
    #[arg(long, default_value = "/assets/tiles")]
    assets_base: String,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<app::GameView>::with_root_and_props(
        root,
        app::AppProps {
            api_base: args.api_base.into(),
            assets_base: args.assets_base.into(),
        },
    )
    .render();
}
