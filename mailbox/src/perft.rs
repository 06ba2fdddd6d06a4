use std::time::Instant;

use super::{Color, Move, Position};

/// Counts the leaf nodes of the move tree `depth` plies deep.
///
/// Sides alternate starting with `color`. Every move is undone with a snapshot, so `position`
/// is unchanged when this returns.
///
/// # Example
/// ```
/// # use mailbox::{perft, Color, Position};
/// let mut position = Position::new(Color::White);
/// assert_eq!(perft(&mut position, Color::White, 2), 400);
/// ```
pub fn perft(position: &mut Position, color: Color, depth: usize) -> u64 {
    // A leaf
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves(color);

    // Every move at the last ply is a leaf, so there's no need to make them
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let snapshot = position.snapshot(mv);
        position.make_move(mv.from(), mv.to());

        nodes += perft(position, color.opponent(), depth - 1);

        position.restore(snapshot);
    }

    nodes
}

/// Perform a perft at the specified depth, reporting the number of nodes reached after each of `color`'s moves.
pub fn split_perft(position: &mut Position, color: Color, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    position
        .legal_moves(color)
        .into_iter()
        .map(|mv| {
            let snapshot = position.snapshot(mv);
            position.make_move(mv.from(), mv.to());

            let nodes = perft(position, color.opponent(), depth - 1);

            position.restore(snapshot);
            (mv, nodes)
        })
        .collect()
}

/// Runs a perft and prints the result, returning the node count.
///
/// With `SPLIT`, each of `color`'s moves is printed with the nodes found below it.
/// With `PRETTY`, the board is printed first and timing figures last.
pub fn print_perft<const PRETTY: bool, const SPLIT: bool>(
    position: &mut Position,
    color: Color,
    depth: usize,
) -> u64 {
    if PRETTY {
        println!("Computing PERFT({depth}) for {color} of the following position:\n{position}\n");
    }

    let now = Instant::now();
    let total_nodes = if SPLIT {
        let split = split_perft(position, color, depth);
        for (mv, nodes) in &split {
            let mv = mv.to_notation(position.player());
            println!("{mv:>8} {nodes:>width$}", width = depth * 2 + 1);
        }
        println!(); // Empty line between last splitperft and total_nodes

        split.into_iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(position, color, depth)
    };
    let elapsed = now.elapsed();

    if PRETTY {
        let nps = total_nodes as f32 / elapsed.as_secs_f32();
        let m_nps = nps / 1_000_000.0;

        println!("Elapsed Time:          {elapsed:.1?}");
        println!("Total Nodes:           {total_nodes}");
        println!("Nodes / Sec:           {nps:.0}");
        println!("M Nodes / Sec:         {m_nps:.1}");
    } else {
        println!("{total_nodes}");
    }

    total_nodes
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_perft_sums_to_perft() {
        let mut position = Position::new(Color::White);
        let split = split_perft(&mut position, Color::White, 3);

        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 8902);
        assert_eq!(position, Position::new(Color::White));
    }

    #[test]
    fn depth_zero_is_one_node() {
        let mut position = Position::new(Color::Black);
        assert_eq!(perft(&mut position, Color::White, 0), 1);
        assert!(split_perft(&mut position, Color::White, 0).is_empty());
    }
}
