use thiserror::Error;

/// Setup failures. Anything listed here prevents the puzzle from being built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("expected 9 tile images, found {found}")]
    MissingTileImages { found: usize },
    #[error("tile image {index} is the same asset as tile image {previous}")]
    DuplicateTileImage { index: usize, previous: usize },
    #[error("occupants {occupants:?} are not a permutation of 1..=9")]
    NotAPermutation { occupants: Vec<u8> },
    #[error("failed to load puzzle assets")]
    AssetLoad,
}
