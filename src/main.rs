use clap::{value_parser, Arg, Command};
use crossterm::{cursor, execute, terminal};
use wildgrass::assets::DirAssetStore;
use wildgrass::game::{Game, GameOptions};
use wildgrass::ui::GameUI;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic handler to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        );

        original_hook(panic_info);
    }));

    let matches = Command::new("wildgrass")
        .about("A terminal-based overworld exploration game with random encounters")
        .version("0.1.0")
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("World seed; a fixed seed replays the same session"),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_parser(value_parser!(u32))
                .default_value("30")
                .help("Target frames per second"),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .value_parser(value_parser!(usize))
                .default_value("2")
                .help("Magnification: terminal cells per world tile"),
        )
        .get_matches();

    if !is_proper_terminal() {
        println!("Wildgrass needs a proper terminal environment.");
        println!("Run it from a real terminal, not an IDE output pane or a pipe.");
        return Ok(());
    }

    let options = GameOptions {
        seed: matches
            .get_one::<u64>("seed")
            .copied()
            .unwrap_or_else(rand::random),
        fps: *matches.get_one::<u32>("fps").unwrap_or(&30),
        scale: *matches.get_one::<usize>("scale").unwrap_or(&2),
        ..GameOptions::default()
    };

    let ui = GameUI::new()?;
    let assets = DirAssetStore::new("assets");
    let mut game = Game::new(ui, assets, options)?;
    let result = game.run();

    // Make sure the terminal is restored even if the run loop failed.
    let _ = crossterm::terminal::disable_raw_mode();

    result?;
    Ok(())
}

fn is_proper_terminal() -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::isatty(std::io::stdin().as_raw_fd()) == 1 }
}
