use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use connect4_minimax::{
    play_game, AlphaBeta, GameConfig, GameSummary, MinimaxStrategy, State, Strategy,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Plays a game of Connect 4: Max moves first with the chosen opponent
/// engine, Min answers with minimax.
#[derive(Debug, Default, Parser)]
#[command(name = "connect4")]
struct Cli {
    /// Search depths, Min's first then Max's (default 9 9)
    #[arg(value_name = "DEPTH", allow_negative_numbers = true)]
    depths: Vec<String>,

    /// Engine playing Max
    #[arg(long, value_enum, default_value_t = Opponent::AlphaBeta)]
    opponent: Opponent,

    /// Move history to start from, e.g. X3O3X4
    #[arg(long, default_value = "")]
    position: String,

    /// Print the end-of-game summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Opponent {
    #[default]
    AlphaBeta,
    Minimax,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = cli_or_defaults(std::env::args_os());
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Parsed command line. Anything clap rejects, other than a help or version
/// request, is logged and replaced by the defaults.
fn cli_or_defaults<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            warn!("ignoring command line: {}", err.to_string().trim_end());
            Cli::default()
        }
    }
}

/// Depths from the command line, or the defaults after printing usage.
fn resolve_config(depths: &[String], out: &mut impl Write) -> io::Result<GameConfig> {
    match GameConfig::from_args(depths) {
        Ok(config) => Ok(config),
        Err(err) => {
            if !depths.is_empty() {
                warn!("{err}");
            }
            writeln!(out, "Usage: connect4 <min-depth> <max-depth>")?;
            Ok(GameConfig::default())
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<GameSummary> {
    let config = resolve_config(&cli.depths, out)?;
    writeln!(out, "min depth: {}", config.min_depth)?;
    writeln!(out, "max depth: {}", config.max_depth)?;

    let start = State::from_moves(&cli.position)?;
    let mut max_player: Box<dyn Strategy> = match cli.opponent {
        Opponent::AlphaBeta => Box::new(AlphaBeta::new()),
        Opponent::Minimax => Box::new(MinimaxStrategy::new()),
    };
    let mut min_player = MinimaxStrategy::new();

    let mut write_err: Option<io::Error> = None;
    let summary = play_game(config, start, max_player.as_mut(), &mut min_player, |turn| {
        if write_err.is_none() {
            if let Err(err) = writeln!(out, "{}", turn.state) {
                write_err = Some(err);
            }
        }
    })?;
    if let Some(err) = write_err {
        return Err(err.into());
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        write_summary(&summary, out)?;
    }
    Ok(summary)
}

fn write_summary(summary: &GameSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, " {} nodes explored", summary.nodes_explored)?;
    writeln!(out, "utility: {}", summary.utility)?;
    writeln!(out, "min depth: {}", summary.min_depth)?;
    writeln!(out, "max depth: {}", summary.max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect4_minimax::Outcome;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("connect4").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn depths_are_read_in_order() {
        let mut out = Vec::new();
        let config = resolve_config(&cli(&["3", "5"]).depths, &mut out).unwrap();
        assert_eq!((config.min_depth, config.max_depth), (3, 5));
        assert!(out.is_empty());
    }

    #[test]
    fn wrong_argument_count_falls_back_to_defaults() {
        for args in [&[][..], &["4"][..], &["1", "2", "3"][..], &["x", "2"][..], &["-1", "2"][..]] {
            let mut out = Vec::new();
            let config = resolve_config(&cli(args).depths, &mut out).unwrap();
            assert_eq!(config, GameConfig::default(), "{args:?}");
            assert!(String::from_utf8(out).unwrap().starts_with("Usage:"));
        }
    }

    #[test]
    fn unknown_flag_falls_back_to_defaults() {
        let parsed = cli_or_defaults(["connect4", "3", "-x"]);
        assert!(parsed.depths.is_empty());
        assert_eq!(parsed.opponent, Opponent::AlphaBeta);
        assert!(!parsed.json);

        let mut out = Vec::new();
        let config = resolve_config(&parsed.depths, &mut out).unwrap();
        assert_eq!(config, GameConfig::default());
        assert!(String::from_utf8(out).unwrap().starts_with("Usage:"));

        let parsed = cli_or_defaults(["connect4", "2", "2", "--opponent", "random"]);
        assert_eq!(parsed.opponent, Opponent::AlphaBeta);
        assert!(parsed.depths.is_empty());
    }

    #[test]
    fn valid_command_line_is_kept() {
        let parsed = cli_or_defaults(["connect4", "4", "6", "--json"]);
        assert_eq!(parsed.depths, vec!["4", "6"]);
        assert!(parsed.json);
    }

    #[test]
    fn parses_flags() {
        let parsed = cli(&["2", "2", "--opponent", "minimax", "--position", "X3O3", "--json"]);
        assert_eq!(parsed.opponent, Opponent::Minimax);
        assert_eq!(parsed.position, "X3O3");
        assert!(parsed.json);
    }

    #[test]
    fn shallow_game_prints_boards_and_summary() {
        let mut out = Vec::new();
        let summary = run(cli(&["1", "2"]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("min depth: 1\nmax depth: 2\n"));
        assert!(text.contains(&format!(" {} nodes explored\n", summary.nodes_explored)));
        assert!(text.contains(&format!("utility: {}\n", summary.utility)));
        assert!(text.ends_with("min depth: 1\nmax depth: 2\n"));
        // Every move prints a six-row board followed by a blank line.
        let board_lines = text.lines().filter(|line| line.len() == 21).count();
        assert_eq!(board_lines, 6 * summary.moves.len());
    }

    #[test]
    fn json_summary() {
        let mut out = Vec::new();
        let summary = run(cli(&["2", "2", "--position", "X0O6X1O6X2O6X5", "--json"]), &mut out).unwrap();
        assert_eq!(summary.outcome, Outcome::MinWins);
        assert_eq!(summary.moves, vec![6]);

        let text = String::from_utf8(out).unwrap();
        let json_start = text.find('{').unwrap();
        let parsed: GameSummary = serde_json::from_str(&text[json_start..]).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn rejects_bad_position() {
        let mut out = Vec::new();
        assert!(run(cli(&["2", "2", "--position", "Z9"]), &mut out).is_err());
    }
}
