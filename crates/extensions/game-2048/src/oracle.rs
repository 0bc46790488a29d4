//! Native move search library loaded at runtime.

use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::sync::Once;

use libloading::Library;
use tracing::{debug, info};

use tilebot_protocols::{Direction, MoveOracle, OracleError, PackedBoard};

/// Library file suffixes, in lookup order.
pub const LIBRARY_SUFFIXES: [&str; 3] = ["so", "dll", "dylib"];

type InitTablesFn = unsafe extern "C" fn();
type ScoreMoveFn = unsafe extern "C" fn(u64, c_int) -> f32;

static INIT_TABLES: Once = Once::new();

/// First `<dir>/2048.<suffix>` that exists.
pub fn find_library(dir: &Path) -> Result<PathBuf, OracleError> {
    LIBRARY_SUFFIXES
        .iter()
        .map(|suffix| dir.join(format!("2048.{}", suffix)))
        .find(|path| path.is_file())
        .ok_or_else(|| OracleError::LibraryNotFound {
            dir: dir.to_path_buf(),
        })
}

/// Scores moves with `score_toplevel_move` from the native library.
pub struct NativeOracle {
    score: ScoreMoveFn,
    path: PathBuf,
    // Keeps `score` valid.
    _library: Library,
}

impl NativeOracle {
    /// Load the library found in `dir`.
    pub fn load(dir: &Path) -> Result<Self, OracleError> {
        Self::load_file(&find_library(dir)?)
    }

    pub fn load_file(path: &Path) -> Result<Self, OracleError> {
        debug!("Loading oracle library {}", path.display());
        // SAFETY: the library's initializers are trusted; it is the search
        // engine shipped alongside this program.
        let library = unsafe { Library::new(path) }.map_err(|e| OracleError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // SAFETY: the signatures match the library's exported C functions.
        let (init, score) = unsafe {
            let init = *library
                .get::<InitTablesFn>(b"init_tables\0")
                .map_err(|_| OracleError::MissingSymbol("init_tables".to_string()))?;
            let score = *library
                .get::<ScoreMoveFn>(b"score_toplevel_move\0")
                .map_err(|_| OracleError::MissingSymbol("score_toplevel_move".to_string()))?;
            (init, score)
        };

        INIT_TABLES.call_once(|| {
            // SAFETY: takes no arguments and only fills the library's tables.
            unsafe { init() };
            info!("Oracle tables initialized");
        });

        Ok(Self {
            score,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MoveOracle for NativeOracle {
    fn score_move(&self, board: PackedBoard, direction: Direction) -> f32 {
        // SAFETY: the tables were initialized in `load_file`, and the search
        // only reads them.
        unsafe { (self.score)(board.0, direction.index() as c_int) }
    }
}
