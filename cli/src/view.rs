use std::io::{self, Write};

use buscaminas_core::{Cell, CellValue, Game, GameState, format_elapsed};

/// Character shown for a cell. Unrevealed cells never leak their value.
pub fn cell_glyph(cell: &Cell, triggered: bool) -> char {
    if !cell.is_revealed() {
        return if cell.is_flagged() { 'F' } else { '#' };
    }
    match cell.value() {
        CellValue::Mine if triggered => 'X',
        CellValue::Mine => '*',
        CellValue::Empty => '.',
        CellValue::Count(n) => char::from(b'0' + n),
        CellValue::Unset => '?',
    }
}

fn status_line(state: GameState) -> &'static str {
    match state {
        GameState::Ready => "reveal any cell to start",
        GameState::Active => "",
        GameState::Won => "¡Victoria!",
        GameState::Lost => "¡Game Over!",
    }
}

pub fn render(game: &Game, elapsed_secs: u64, out: &mut impl Write) -> io::Result<()> {
    let (rows, cols) = game.size();

    writeln!(
        out,
        "mines {:>4}   time {}   {}",
        game.mines_left(),
        format_elapsed(elapsed_secs),
        status_line(game.state())
    )?;

    write!(out, "    ")?;
    for col in 0..cols {
        write!(out, "{:>3}", col)?;
    }
    writeln!(out)?;

    for row in 0..rows {
        write!(out, "{:>3} ", row)?;
        for col in 0..cols {
            let cell = &game.grid()[(row, col)];
            let triggered = game.triggered_mine() == Some((row, col));
            write!(out, "{:>3}", cell_glyph(cell, triggered))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(game: &Game, elapsed_secs: u64) -> String {
        let mut out = Vec::new();
        render(game, elapsed_secs, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn hidden_board_shows_no_values() {
        let game = Game::with_mines((2, 3), &[(0, 0)]).unwrap();
        let text = rendered(&game, 0);

        assert!(text.starts_with("mines    1   time 00:00"));
        assert_eq!(text.lines().nth(2).unwrap(), "  0   #  #  #");
        assert!(!text.contains('*'));
    }

    #[test]
    fn lost_board_marks_triggered_mine() {
        let mut game = Game::with_mines((1, 4), &[(0, 0), (0, 3)]).unwrap();
        game.reveal((0, 1)).unwrap();
        game.reveal((0, 3)).unwrap();

        let text = rendered(&game, 75);

        assert!(text.contains("time 01:15"));
        assert!(text.contains("¡Game Over!"));
        assert_eq!(text.lines().nth(2).unwrap(), "  0   *  1  #  X");
    }

    #[test]
    fn flags_and_empties() {
        let mut game = Game::with_mines((1, 5), &[(0, 3)]).unwrap();
        game.reveal((0, 0)).unwrap();
        game.toggle_flag((0, 3)).unwrap();

        assert_eq!(rendered(&game, 0).lines().nth(2).unwrap(), "  0   .  .  1  F  #");
    }
}
