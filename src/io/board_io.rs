use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::board::{Board, BoardError, BoardSnapshot};

/// Error type for loading a board snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid board in {path}: {source}")]
    Invalid { path: PathBuf, source: BoardError },
}

/// Parse snapshot JSON text into a board
pub fn parse_board(text: &str) -> Result<Board, SnapshotError> {
    parse_at(text, Path::new("<input>"))
}

/// Load a board snapshot file
pub fn load_board(path: &Path) -> Result<Board, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|e| SnapshotError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let board = parse_at(&text, path)?;
    debug!(
        path = %path.display(),
        columns = board.column_count(),
        cards = board.card_count(),
        "board loaded"
    );
    Ok(board)
}

fn parse_at(text: &str, path: &Path) -> Result<Board, SnapshotError> {
    let snapshot: BoardSnapshot =
        serde_json::from_str(text).map_err(|e| SnapshotError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    Board::from_snapshot(snapshot).map_err(|e| SnapshotError::Invalid {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardRef;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const LEADS: &str = r#"{ "title": "Leads", "columns": [
        { "status": "New", "cards": [ { "model": "lead", "id": 7, "label": "Acme" } ] },
        { "status": "Contacted", "cards": [] } ] }"#;

    #[test]
    fn test_load_board_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("leads.json");
        fs::write(&path, LEADS).unwrap();

        let board = load_board(&path).unwrap();
        assert_eq!(board.title, "Leads");
        assert_eq!(board.column_count(), 2);
        assert_eq!(board.status_of(&CardRef::new("lead", "7")), Some("New"));
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_board(&tmp.path().join("none.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::ReadError { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_board("{ \"columns\": [ }").unwrap_err();
        assert!(matches!(err, SnapshotError::ParseError { .. }));
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let err = parse_board(
            r#"{"columns": [
                {"status": "a", "cards": [{"model": "lead", "id": 1}]},
                {"status": "b", "cards": [{"model": "lead", "id": "1"}]}
            ]}"#,
        )
        .unwrap_err();
        match err {
            SnapshotError::Invalid { source, .. } => {
                assert_eq!(source, BoardError::DuplicateCard(CardRef::new("lead", "1")))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
