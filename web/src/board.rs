use ndarray::Array2;
use sapper_protocol::{CellCode, Coord, GameSnapshot};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

/// Visual symbol for one display cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CellSymbol {
    Hidden,
    Flag,
    Mine,
    DetonatedMine,
    Revealed(u8),
}

impl CellSymbol {
    /// Tile image filename for this symbol, relative to the assets base.
    pub(crate) fn tile_image(self) -> String {
        match self {
            Self::Hidden => "unrevealed.png".to_string(),
            Self::Flag => "flag.png".to_string(),
            Self::Mine => "bomb.png".to_string(),
            Self::DetonatedMine => "boom.png".to_string(),
            Self::Revealed(count) => format!("{count}.png"),
        }
    }
}

/// Symbol for the cell at `(row, col)`.
///
/// An `M` at the last move's own coordinates is the mine that ended the game
/// and renders as detonated; every other `M` is incidental.
pub(crate) fn cell_symbol(snapshot: &GameSnapshot, row: Coord, col: Coord) -> CellSymbol {
    match snapshot.cell_at(row, col) {
        None | Some(CellCode::Hidden) => CellSymbol::Hidden,
        Some(CellCode::Flagged) => CellSymbol::Flag,
        Some(CellCode::Mine) => {
            let detonated = snapshot
                .last_move
                .is_some_and(|last| last.hit_mine && last.row == row && last.col == col);
            if detonated {
                CellSymbol::DetonatedMine
            } else {
                CellSymbol::Mine
            }
        }
        Some(CellCode::Adjacent(count)) => CellSymbol::Revealed(count),
    }
}

/// Full display projection of one snapshot: what every cell shows, and
/// whether the grid takes input at all. Input is gated here and nowhere
/// else; within a live game every cell keeps its handlers and the server
/// decides what a redundant move means.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardView {
    pub cells: Array2<CellSymbol>,
    pub interactive: bool,
}

pub(crate) fn project(snapshot: &GameSnapshot) -> BoardView {
    debug_assert!(snapshot.dims_consistent());
    let shape = (
        snapshot.board_height as usize,
        snapshot.board_width as usize,
    );
    let cells = Array2::from_shape_fn(shape, |(row, col)| {
        cell_symbol(snapshot, row as Coord, col as Coord)
    });
    BoardView {
        cells,
        interactive: snapshot.status.is_live(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum CellAction {
    Reveal,
    ToggleFlag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CellMsg {
    pub row: Coord,
    pub col: Coord,
    pub action: CellAction,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct CellProps {
    pub row: Coord,
    pub col: Coord,
    pub symbol: CellSymbol,
    #[prop_or_default]
    pub interactive: bool,
    pub assets_base: AttrValue,
    pub callback: Callback<CellMsg>,
}

#[function_component(CellView)]
pub(crate) fn cell_component(props: &CellProps) -> Html {
    use CellSymbol::*;

    let CellProps {
        row,
        col,
        symbol,
        interactive,
        assets_base,
        callback,
    } = props.clone();

    let class = classes!(
        "cell",
        match symbol {
            Hidden => classes!(),
            Flag => classes!("flag"),
            Mine => classes!("open", "mine"),
            DetonatedMine => classes!("open", "mine", "oops"),
            Revealed(count) => classes!("open", format!("num-{}", count)),
        }
    );
    let style = format!(
        "background-image: url('{}/{}')",
        assets_base,
        symbol.tile_image()
    );

    let onclick = interactive.then(|| {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg {
                row,
                col,
                action: CellAction::Reveal,
            });
            log::trace!("({}, {}) reveal", row, col);
        })
    });

    let oncontextmenu = interactive.then(|| {
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            callback.emit(CellMsg {
                row,
                col,
                action: CellAction::ToggleFlag,
            });
            log::trace!("({}, {}) toggle flag", row, col);
        })
    });

    html! {
        <td {class} {style} {onclick} {oncontextmenu}/>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_protocol::GameStatus;

    fn snapshot(status: GameStatus) -> GameSnapshot {
        serde_json::from_str(&format!(
            r#"{{
                "status": {},
                "board": [["H", "F", "M"], ["M", "3", "0"]],
                "board_width": 3,
                "board_height": 2,
                "num_mines": 2,
                "flags_total": 1,
                "moves_count": 5,
                "last_move": {{"row": 0, "col": 2, "hit_mine": true}}
            }}"#,
            serde_json::to_string(&status).unwrap()
        ))
        .unwrap()
    }

    #[test]
    fn symbols_follow_the_priority_order() {
        let snapshot = snapshot(GameStatus::Lost);

        assert_eq!(cell_symbol(&snapshot, 0, 0), CellSymbol::Hidden);
        assert_eq!(cell_symbol(&snapshot, 0, 1), CellSymbol::Flag);
        assert_eq!(cell_symbol(&snapshot, 1, 1), CellSymbol::Revealed(3));
        assert_eq!(cell_symbol(&snapshot, 1, 2), CellSymbol::Revealed(0));
    }

    #[test]
    fn only_the_last_move_mine_detonates() {
        let snapshot = snapshot(GameStatus::Lost);

        assert_eq!(cell_symbol(&snapshot, 0, 2), CellSymbol::DetonatedMine);
        assert_eq!(cell_symbol(&snapshot, 1, 0), CellSymbol::Mine);
    }

    #[test]
    fn mine_stays_generic_when_last_move_missed() {
        let mut snapshot = snapshot(GameStatus::Lost);
        if let Some(last) = snapshot.last_move.as_mut() {
            last.hit_mine = false;
        }

        assert_eq!(cell_symbol(&snapshot, 0, 2), CellSymbol::Mine);
    }

    #[test]
    fn grid_is_interactive_only_while_active() {
        assert!(project(&snapshot(GameStatus::Active)).interactive);
        for status in [
            GameStatus::Won,
            GameStatus::Lost,
            GameStatus::Abandoned,
            GameStatus::Error,
        ] {
            assert!(!project(&snapshot(status)).interactive);
        }
    }

    #[test]
    fn projection_is_pure() {
        let snapshot = snapshot(GameStatus::Lost);
        assert_eq!(project(&snapshot), project(&snapshot));
    }

    #[test]
    fn projection_matches_board_shape() {
        let board = project(&snapshot(GameStatus::Active));
        assert_eq!(board.cells.nrows(), 2);
        assert_eq!(board.cells.ncols(), 3);
    }

    #[test]
    fn tile_images_match_the_asset_set() {
        assert_eq!(CellSymbol::Hidden.tile_image(), "unrevealed.png");
        assert_eq!(CellSymbol::Flag.tile_image(), "flag.png");
        assert_eq!(CellSymbol::Mine.tile_image(), "bomb.png");
        assert_eq!(CellSymbol::DetonatedMine.tile_image(), "boom.png");
        assert_eq!(CellSymbol::Revealed(7).tile_image(), "7.png");
    }
}
