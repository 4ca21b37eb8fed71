//! Rules-engine invariants: legality, validity, and win detection.

use duelgrid::{
    Action, Board, Cell, GameKind, Seat, Shape, Target, WinStatus, World, world_for,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn ttt(text: &str) -> Board {
    Board::from_text(Shape::TIC_TAC_TOE, text).unwrap()
}

fn c4(text: &str) -> Board {
    Board::from_text(Shape::CONNECT_FOUR, text).unwrap()
}

#[test]
fn illegal_actions_always_yield_the_sentinel() {
    // Legality monotonicity: is_legal false implies next_state None.
    for kind in [GameKind::TicTacToe, GameKind::ConnectFour] {
        let world = world_for(kind);
        let mut rng = StdRng::seed_from_u64(13);
        let shape = world.shape();

        for _ in 0..10 {
            // Random mid-game board reached through the engine itself.
            let mut board = Board::empty(shape);
            let mut seat = Seat::One;
            for _ in 0..rng.random_range(0..6) {
                let choices = world.next_states(&board, seat);
                if choices.is_empty() {
                    break;
                }
                let (code, _) = choices[rng.random_range(0..choices.len())];
                board = code.decode(shape).flipped();
                seat = seat.opponent();
            }

            for action in world.actions(seat) {
                if !world.is_legal(&board, action) {
                    assert_eq!(world.next_state(&board, action), None);
                }
            }
        }
    }
}

#[test]
fn next_state_results_always_satisfy_is_valid() {
    // Validity necessity, checked across random playouts of both games.
    for kind in [GameKind::TicTacToe, GameKind::ConnectFour] {
        let world = world_for(kind);
        let mut rng = StdRng::seed_from_u64(29);
        let shape = world.shape();

        for _ in 0..10 {
            let mut board = Board::empty(shape);
            let mut seat = Seat::One;
            while !world.game_over(&board).is_terminal() {
                let choices = world.next_states(&board, seat);
                assert!(
                    !choices.is_empty(),
                    "non-terminal state must offer actions"
                );
                let (code, action) = choices[rng.random_range(0..choices.len())];
                let next = code.decode(shape);
                assert!(
                    world.is_valid(&next, action.seat),
                    "{kind:?}: next_state produced an invalid board\n{next}"
                );
                board = next.flipped();
                seat = seat.opponent();
            }
        }
    }
}

#[test]
fn validity_rejects_simultaneous_wins() {
    let ttt_world = world_for(GameKind::TicTacToe);
    let both = ttt("XXX OOO ...");
    assert!(!ttt_world.is_valid(&both, Seat::One));
    assert!(!ttt_world.is_valid(&both, Seat::Two));

    let c4_world = world_for(GameKind::ConnectFour);
    let both = c4("....... ....... ....... ....... XXXX... OOOO...");
    assert!(!c4_world.is_valid(&both, Seat::One));
    assert!(!c4_world.is_valid(&both, Seat::Two));
}

#[test]
fn scenario_center_opening() {
    // Empty board, mover places the center cell; the encoded result must
    // decode to exactly one own piece at the center and validate.
    let world = world_for(GameKind::TicTacToe);
    let empty = Board::empty(Shape::TIC_TAC_TOE);
    let code = world
        .next_state(&empty, Action::place(1, 1, Seat::One))
        .expect("center opening is legal");

    let board = code.decode(Shape::TIC_TAC_TOE);
    assert_eq!(board.get(1, 1), Cell::Own);
    assert_eq!(board.count(Cell::Own), 1);
    assert_eq!(board.count(Cell::Opp), 0);
    assert!(world.is_valid(&board, Seat::One));
}

#[test]
fn scenario_full_column_excluded() {
    // A full column is excluded from legal actions for either seat.
    let world = world_for(GameKind::ConnectFour);
    let board = c4("...X... ...O... ...X... ...O... ...X... ...O...");

    for seat in [Seat::One, Seat::Two] {
        let action = Action::drop(3, seat);
        assert!(!world.is_legal(&board, action));
        assert_eq!(world.next_state(&board, action), None);
        assert!(
            world
                .next_states(&board, seat)
                .iter()
                .all(|(_, a)| a.target != Target::Drop { col: 3 })
        );
    }
}

#[test]
fn scenario_column_win_detected() {
    // Four own pieces in a column read as a win wherever the column sits.
    let world = world_for(GameKind::ConnectFour);
    for col in 0..7 {
        let mut board = Board::empty(Shape::CONNECT_FOUR);
        for row in 2..6 {
            board = board.with_cell(row, col, Cell::Own);
        }
        assert_eq!(
            world.winner(&board),
            WinStatus::Won,
            "column {col} win missed"
        );
    }
}

#[test]
fn terminal_boards_offer_no_moves_through_game_over() {
    let world = world_for(GameKind::TicTacToe);
    let won = ttt("XXX OO. ...");
    assert!(world.game_over(&won).is_terminal());

    let drawn = ttt("XOX XOO OXX");
    assert!(world.game_over(&drawn).is_terminal());
    assert_eq!(world.winner(&drawn), WinStatus::Open);
}

#[test]
fn start_states_match_first_move_rules() {
    let ttt_world = world_for(GameKind::TicTacToe);
    assert_eq!(ttt_world.start_states(Seat::One).len(), 1);
    assert_eq!(ttt_world.start_states(Seat::Two).len(), 9);

    let c4_world = world_for(GameKind::ConnectFour);
    assert_eq!(c4_world.start_states(Seat::One).len(), 1);
    let second = c4_world.start_states(Seat::Two);
    assert_eq!(second.len(), 7);
    for code in second {
        let board = code.decode(Shape::CONNECT_FOUR);
        // The opener's piece sits on the bottom row.
        assert_eq!(board.count(Cell::Opp), 1);
        assert!((0..7).any(|col| board.get(5, col) == Cell::Opp));
    }
}
