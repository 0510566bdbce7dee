use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event};
use wikiseek_core::{update, AppState, Msg};
use wikiseek_engine::{load_endpoint, EngineHandle, WikiClient};
use wikiseek_logging::{seek_debug, seek_info, seek_warn};

use super::config::{AppConfig, Cli};
use super::effects::{EffectRunner, SystemBrowser};
use super::ui::input::{map_key, map_mouse, UiAction};
use super::ui::render::render;
use super::ui::terminal::TerminalGuard;
use super::{logging, persistence};

const INPUT_POLL: Duration = Duration::from_millis(25);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    logging::initialize(&config.log_file(cli.log_file.as_deref()), config.log_level());
    if let Some(err) = config_error {
        seek_warn!("Using default configuration: {:#}", err);
    }

    let sites = config.sites();
    let store = persistence::open_store(&config);
    let restored = load_endpoint(&store);
    let client = WikiClient::new(config.fetch_settings()).context("building HTTP client")?;
    let engine = EngineHandle::new(client, sites.clone());
    let mut runner = EffectRunner::new(engine, store, Box::new(SystemBrowser));
    let mut state = AppState::with_sites(sites);

    seek_info!("Popup starting on {:?}", restored);
    dispatch(&mut state, Msg::EndpointRestored(restored), &mut runner);
    if let Some(wiki) = cli.wiki {
        dispatch(&mut state, Msg::EndpointSelected(wiki.into()), &mut runner);
    }
    if let Some(query) = cli.query {
        dispatch(&mut state, Msg::InputChanged(query), &mut runner);
    }

    let mut terminal = TerminalGuard::enter().context("entering terminal mode")?;
    render(terminal.out(), &state.view())?;
    state.consume_dirty();

    loop {
        while let Some(msg) = runner.poll() {
            dispatch(&mut state, msg, &mut runner);
        }
        if runner.is_closed() {
            break;
        }
        if runner.take_focus_request() {
            seek_debug!("Input keeps focus after background open");
        }
        if state.consume_dirty() {
            render(terminal.out(), &state.view())?;
        }

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let view = state.view();
        let action = match event::read()? {
            Event::Key(key) => map_key(key, &view),
            Event::Mouse(mouse) => map_mouse(mouse, &view),
            Event::Resize(_, _) => {
                render(terminal.out(), &view)?;
                UiAction::Ignore
            }
            _ => UiAction::Ignore,
        };
        match action {
            UiAction::Dispatch(msg) => dispatch(&mut state, msg, &mut runner),
            UiAction::Quit => {
                seek_info!("Popup dismissed");
                break;
            }
            UiAction::Ignore => {}
        }
    }
    Ok(())
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &mut EffectRunner) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.run(effects);
}
