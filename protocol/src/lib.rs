//! Wire types exchanged with the remote minesweeper service.
//!
//! The service is the single source of truth for game rules; everything in
//! here is a display projection of its state, never the mine layout itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Linear dimension, used for individual coordinates or board width/height
pub type Coord = u16;

/// Area dimension, used for mine/flag/move counts
pub type CellCount = u32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodeError {
    #[error("unknown cell code {0:?}")]
    UnknownCell(String),
    #[error("adjacent mine count out of range: {0}")]
    CountOutOfRange(u8),
}

/// Game status as reported by the service.
///
/// This is a closed set: any other tag on the wire fails deserialization
/// instead of silently falling through to some default.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Won,
    Lost,
    Abandoned,
    Error,
}

impl GameStatus {
    /// Whether the board still accepts moves.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Per-cell display value: `"H"`, `"F"`, `"M"` or a digit `"0"`..`"8"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CellCode {
    Hidden,
    Flagged,
    Mine,
    Adjacent(u8),
}

impl CellCode {
    pub fn adjacent(count: u8) -> Result<Self, CodeError> {
        if count <= 8 {
            Ok(Self::Adjacent(count))
        } else {
            Err(CodeError::CountOutOfRange(count))
        }
    }
}

impl TryFrom<String> for CellCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, CodeError> {
        match value.as_str() {
            "H" => Ok(Self::Hidden),
            "F" => Ok(Self::Flagged),
            "M" => Ok(Self::Mine),
            other => match other.parse::<u8>() {
                Ok(count) => Self::adjacent(count),
                Err(_) => Err(CodeError::UnknownCell(value)),
            },
        }
    }
}

impl From<CellCode> for String {
    fn from(code: CellCode) -> String {
        match code {
            CellCode::Hidden => "H".to_string(),
            CellCode::Flagged => "F".to_string(),
            CellCode::Mine => "M".to_string(),
            CellCode::Adjacent(count) => count.to_string(),
        }
    }
}

/// Target of the most recent action, and whether it detonated a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub row: Coord,
    pub col: Coord,
    pub hit_mine: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndResult {
    Win,
    Lose,
}

/// One authoritative state of the game, replacing any prior snapshot
/// wholesale on arrival.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub board: Vec<Vec<CellCode>>,
    pub board_width: Coord,
    pub board_height: Coord,
    pub num_mines: CellCount,
    pub flags_total: CellCount,
    #[serde(default)]
    pub moves_count: CellCount,
    #[serde(default)]
    pub last_move: Option<LastMove>,
    #[serde(default)]
    pub revealed_total: CellCount,
    #[serde(default)]
    pub end_result: Option<EndResult>,
    #[serde(default)]
    pub game_id: Option<String>,
}

impl GameSnapshot {
    /// Mines not yet accounted for by flags; negative when over-flagged,
    /// deliberately not clamped.
    pub fn mines_left(&self) -> i32 {
        self.num_mines as i32 - self.flags_total as i32
    }

    /// Whether `board` really is `board_height` rows of `board_width` cells.
    pub fn dims_consistent(&self) -> bool {
        self.board.len() == self.board_height as usize
            && self
                .board
                .iter()
                .all(|row| row.len() == self.board_width as usize)
    }

    pub fn cell_at(&self, row: Coord, col: Coord) -> Option<CellCode> {
        self.board.get(row as usize)?.get(col as usize).copied()
    }
}

/// Body of the start-new-game request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub board_width: Coord,
    pub board_height: Coord,
    pub num_mines: CellCount,
}

/// Body of the reveal/flag requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub row: Coord,
    pub col: Coord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> &'static str {
        r#"{
            "status": "lost",
            "board": [["H", "F"], ["3", "M"]],
            "board_width": 2,
            "board_height": 2,
            "num_mines": 1,
            "flags_total": 1,
            "moves_count": 4,
            "last_move": {"row": 1, "col": 1, "hit_mine": true},
            "revealed_total": 1,
            "end_result": "lose"
        }"#
    }

    #[test]
    fn snapshot_parses_full_server_payload() {
        let snapshot: GameSnapshot = serde_json::from_str(fixture()).unwrap();

        assert_eq!(snapshot.status, GameStatus::Lost);
        assert_eq!(snapshot.cell_at(0, 0), Some(CellCode::Hidden));
        assert_eq!(snapshot.cell_at(0, 1), Some(CellCode::Flagged));
        assert_eq!(snapshot.cell_at(1, 0), Some(CellCode::Adjacent(3)));
        assert_eq!(snapshot.cell_at(1, 1), Some(CellCode::Mine));
        assert_eq!(
            snapshot.last_move,
            Some(LastMove {
                row: 1,
                col: 1,
                hit_mine: true
            })
        );
        assert_eq!(snapshot.end_result, Some(EndResult::Lose));
        assert!(snapshot.dims_consistent());
    }

    #[test]
    fn snapshot_tolerates_minimal_payload() {
        // older service builds omit move metadata entirely
        let snapshot: GameSnapshot = serde_json::from_str(
            r#"{
                "status": "active",
                "board": [["H"]],
                "board_width": 1,
                "board_height": 1,
                "num_mines": 1,
                "flags_total": 0
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.moves_count, 0);
        assert_eq!(snapshot.last_move, None);
        assert_eq!(snapshot.end_result, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<GameStatus, _> = serde_json::from_str(r#""paused""#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_cell_code_is_rejected() {
        assert_eq!(
            CellCode::try_from("Q".to_string()),
            Err(CodeError::UnknownCell("Q".to_string()))
        );
        assert_eq!(
            CellCode::try_from("9".to_string()),
            Err(CodeError::CountOutOfRange(9))
        );
    }

    #[test]
    fn cell_codes_keep_their_wire_form() {
        assert_eq!(String::from(CellCode::Hidden), "H");
        assert_eq!(String::from(CellCode::Adjacent(8)), "8");
        assert_eq!(CellCode::try_from("0".to_string()), Ok(CellCode::Adjacent(0)));
    }

    #[test]
    fn mines_left_goes_negative_when_over_flagged() {
        let mut snapshot: GameSnapshot = serde_json::from_str(fixture()).unwrap();
        snapshot.num_mines = 2;
        snapshot.flags_total = 5;
        assert_eq!(snapshot.mines_left(), -3);
    }

    #[test]
    fn ragged_board_fails_consistency_check() {
        let mut snapshot: GameSnapshot = serde_json::from_str(fixture()).unwrap();
        snapshot.board[1].pop();
        assert!(!snapshot.dims_consistent());
    }
}
