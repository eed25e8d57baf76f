// Simple command-line application to play a tap game in the terminal

use std::io::{self, BufRead, Write};
use std::time::Instant;
use tapchess::{board::PrettyStyle, clock::format_time, Coord, GameConfig, GameController, Side};

fn main() {
    let mut stdin = io::stdin().lock();

    let mut game = match GameController::with_config(GameConfig::default()) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Bad config: {}", e);
            return;
        }
    };
    game.on_piece_moved(|mv| println!("Moved {} {}", mv.piece, mv));
    game.on_game_over(|outcome| println!("Game finished: {}", outcome));
    game.start_clock();

    loop {
        // Time passes while we wait for input, so catch up the clock before each turn.
        game.poll_clock(Instant::now());
        if game.is_finished() {
            break;
        }

        println!("{}", game.board().pretty(PrettyStyle::Utf8));
        if let Some(clock) = game.clock() {
            println!(
                "White {}  Black {}",
                format_time(clock.get(Side::White).remaining()),
                format_time(clock.get(Side::Black).remaining()),
            );
        }
        print!("{} move (e.g. `e2 e4`): ", game.side_to_move().as_long_str());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }

        let cells: Result<Vec<Coord>, _> = s.split_whitespace().map(str::parse::<Coord>).collect();
        let cells = match cells {
            Ok(cells) if cells.len() == 2 => cells,
            Ok(_) => {
                println!("Expected two cells");
                println!();
                continue;
            }
            Err(e) => {
                println!("Bad cell: {}", e);
                println!();
                continue;
            }
        };

        game.poll_clock(Instant::now());
        for c in &cells {
            game.handle_cell_touch(c.row() as i32, c.col() as i32);
        }
        if game.selected_cell().is_some() {
            game.clear_selection();
        }
        println!();
    }

    for side in Side::iter() {
        let captured: String = game
            .board()
            .captured(side)
            .iter()
            .map(|p| p.as_utf8_char())
            .collect();
        println!("{} captured: {}", side.as_long_str(), captured);
    }
}
