use mailbox::{fen_side_to_move, perft, Color, Position, FEN_KIWIPETE, FEN_STARTPOS};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let color = fen_side_to_move(fen).unwrap();

    // Node counts must not depend on which side sits at the bottom of the board
    for player in Color::iter() {
        let mut position = Position::from_fen(fen, player).unwrap();
        let before = position.clone();

        let nodes = perft(&mut position, color, depth);
        assert_eq!(
            nodes, expected,
            "\nPerft({depth}, \"{fen}\") failed with {player} at the bottom\nExpected: {expected}\nGot: {nodes}"
        );
        assert_eq!(position, before, "Perft did not restore the position");
    }
}

#[cfg(test)]
mod startpos_perft {
    use super::*;

    #[test]
    fn startpos_perft_1() {
        test_perft_fen_nodes(1, FEN_STARTPOS, 20);
    }

    #[test]
    fn startpos_perft_2() {
        test_perft_fen_nodes(2, FEN_STARTPOS, 400);
    }

    #[test]
    fn startpos_perft_3() {
        test_perft_fen_nodes(3, FEN_STARTPOS, 8902);
    }

    #[test]
    fn startpos_perft_4() {
        test_perft_fen_nodes(4, FEN_STARTPOS, 197281);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use super::*;

    #[test]
    fn kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN_KIWIPETE, 48);
    }

    #[test]
    fn kiwipete_perft_2() {
        test_perft_fen_nodes(2, FEN_KIWIPETE, 2039);
    }

    #[test]
    fn kiwipete_perft_3() {
        test_perft_fen_nodes(3, FEN_KIWIPETE, 97862);
    }
}

/// Positions from <https://www.chessprogramming.org/Perft_Results>, to depths that reach no promotions.
#[cfg(test)]
mod cpw_perft {
    use super::*;

    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_6: &str =
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

    #[test]
    fn position_3_perft_1() {
        test_perft_fen_nodes(1, POSITION_3, 14);
    }

    #[test]
    fn position_3_perft_2() {
        test_perft_fen_nodes(2, POSITION_3, 191);
    }

    #[test]
    fn position_3_perft_3() {
        test_perft_fen_nodes(3, POSITION_3, 2812);
    }

    #[test]
    fn position_3_perft_4() {
        test_perft_fen_nodes(4, POSITION_3, 43238);
    }

    #[test]
    fn position_4_perft_1() {
        test_perft_fen_nodes(1, POSITION_4, 6);
    }

    #[test]
    fn position_6_perft_1() {
        test_perft_fen_nodes(1, POSITION_6, 46);
    }

    #[test]
    fn position_6_perft_2() {
        test_perft_fen_nodes(2, POSITION_6, 2079);
    }

    #[test]
    fn position_6_perft_3() {
        test_perft_fen_nodes(3, POSITION_6, 89890);
    }
}
