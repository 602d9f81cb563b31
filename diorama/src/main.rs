use std::io::{self, BufReader};

use clap::Parser;
use diorama::{config::Args, Session, TerminalRenderer, UciClient};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let renderer = TerminalRenderer::new(io::stdout(), !args.no_color);
    let mut session = Session::new(
        BufReader::new(io::stdin()),
        io::stdout(),
        renderer,
        args.animation(),
    );

    if let Some(path) = &args.engine {
        let mut engine = UciClient::spawn(path)?;
        engine.handshake(&args.options)?;
        info!(
            "Playing {} against {}",
            args.play_as,
            engine.name().unwrap_or("the engine")
        );
        session = session.with_engine(Box::new(engine), args.play_as, args.movetime());
    } else {
        info!("No engine given; both sides play from the keyboard");
    }

    let outcome = session.run()?;
    info!("Session over: {outcome:?}");
    Ok(())
}
