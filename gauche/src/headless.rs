//! Headless mode for the quiz.
//!
//! A simple line-oriented interface for running the game without a TUI,
//! for scripts and automated testing.

use gauche_core::{Choice, GameBoard, IdeaSource, KeyValueStorage, Phase};
use std::io::{self, BufRead, Write};

/// What to do after a line has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Quit,
}

/// Run the game in headless mode.
///
/// This provides a simple line-oriented protocol:
/// - `g`/`gauche`/`left` and `d`/`droite`/`right` classify the current idea
/// - Lines starting with `#` are commands (reset, retry, status, help, quit)
/// - Output lines are tagged: `[IDEA]`, `[CATEGORY]`, `[EMPTY]`, `[ERROR]`...
pub async fn run_headless<S, K>(mut game: GameBoard<S, K>) -> io::Result<()>
where
    S: IdeaSource,
    K: KeyValueStorage,
{
    let mut stdout = io::stdout();

    writeln!(stdout, "=== Gauche ou Droite ? ===")?;
    writeln!(stdout, "Source: {}", game.repository().source().describe())?;
    writeln!(stdout, "Vues: {}", game.seen_count())?;
    writeln!(stdout)?;
    print_commands(&mut stdout)?;
    writeln!(stdout)?;

    game.load_next().await;
    print_board(&game, &mut stdout)?;
    stdout.flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let outcome = handle_line(&mut game, &line, &mut stdout).await?;
        stdout.flush()?;

        if outcome == LineOutcome::Quit {
            break;
        }
    }

    Ok(())
}

/// Handle one input line, writing the response to `out`
pub async fn handle_line<S, K, W>(
    game: &mut GameBoard<S, K>,
    line: &str,
    out: &mut W,
) -> io::Result<LineOutcome>
where
    S: IdeaSource,
    K: KeyValueStorage,
    W: Write,
{
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineOutcome::Continue);
    }

    // Handle commands
    if let Some(command) = line.strip_prefix('#') {
        match command.trim() {
            "quit" | "exit" => {
                writeln!(out, "Au revoir !")?;
                return Ok(LineOutcome::Quit);
            }
            "reset" => {
                game.reset().await;
                writeln!(out, "[RESET] Historique effacé")?;
                print_board(game, out)?;
            }
            "retry" => {
                game.retry().await;
                print_board(game, out)?;
            }
            "status" => {
                writeln!(out, "[STATUS]")?;
                writeln!(out, "  Source: {}", game.repository().source().describe())?;
                writeln!(out, "  Vues: {}", game.seen_count())?;
                writeln!(out, "  Réponses: {}", game.board().answered())?;
                writeln!(out, "  État: {:?}", game.phase())?;
            }
            "help" => {
                writeln!(out, "[HELP]")?;
                print_commands(out)?;
            }
            other => {
                writeln!(out, "[ERROR] Unknown command: #{other}. Type #help for commands.")?;
            }
        }
        return Ok(LineOutcome::Continue);
    }

    let Some(choice) = Choice::parse(line) else {
        writeln!(out, "[ERROR] Unknown answer: {line}. Use g (gauche) or d (droite).")?;
        return Ok(LineOutcome::Continue);
    };

    if !game.board().can_choose() {
        writeln!(out, "[ERROR] No idea to classify. Use #retry or #reset.")?;
        return Ok(LineOutcome::Continue);
    }

    writeln!(out, "[CHOSEN] {}", choice.label())?;
    game.choose(choice).await;
    print_board(game, out)?;

    Ok(LineOutcome::Continue)
}

fn print_board<S, K, W>(game: &GameBoard<S, K>, out: &mut W) -> io::Result<()>
where
    S: IdeaSource,
    K: KeyValueStorage,
    W: Write,
{
    match game.phase() {
        Phase::ShowingIdea => {
            if let Some(idea) = game.current_idea() {
                writeln!(out, "[IDEA] {}", idea.text)?;
                if let Some(category) = &idea.category {
                    writeln!(out, "[CATEGORY] {category}")?;
                }
            }
        }
        Phase::Empty => writeln!(out, "[EMPTY] {}", game.board().error_message())?,
        Phase::Error => writeln!(out, "[ERROR] {}", game.board().error_message())?,
        Phase::Loading => {}
    }
    Ok(())
}

fn print_commands<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Answers:")?;
    writeln!(out, "  g, gauche, left   - Classify as left")?;
    writeln!(out, "  d, droite, right  - Classify as right")?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  #reset   - Clear seen history and reload")?;
    writeln!(out, "  #retry   - Retry after an error (resets when all ideas are seen)")?;
    writeln!(out, "  #status  - Show progress")?;
    writeln!(out, "  #help    - Show this help")?;
    writeln!(out, "  #quit    - Exit")?;
    Ok(())
}
