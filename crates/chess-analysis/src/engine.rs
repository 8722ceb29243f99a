//! UCI engine session (e.g. Stockfish) implementing [`Oracle`].

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use chess_board::Color;
use tracing::{debug, trace};

use crate::evaluation::Evaluation;
use crate::oracle::{Oracle, OracleError, OracleProvider, SearchLimit};

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 1000;

/// Engine options applied after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub threads: u32,
    pub hash_mb: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            threads: 2,
            hash_mb: 256,
        }
    }
}

/// A score as reported by the engine, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciScore {
    Cp(i32),
    Mate(i32),
}

impl UciScore {
    /// Converts to a white-positive evaluation.
    ///
    /// `mate 0` means the side to move is already mated.
    pub fn normalize(self, side_to_move: Color) -> Evaluation {
        let sign = match side_to_move {
            Color::White => 1,
            Color::Black => -1,
        };
        match self {
            UciScore::Cp(cp) => Evaluation::Centipawns(cp * sign),
            UciScore::Mate(0) => Evaluation::Mate {
                winner: side_to_move.opposite(),
                moves: 0,
            },
            UciScore::Mate(n) => {
                let winner = if n > 0 {
                    side_to_move
                } else {
                    side_to_move.opposite()
                };
                Evaluation::Mate {
                    winner,
                    moves: n.unsigned_abs(),
                }
            }
        }
    }
}

/// A running UCI engine process.
///
/// The process is told to `quit` and reaped when this value is dropped.
pub struct UciEngine {
    /// The engine process handle.
    process: Child,
    /// Writer for sending commands to the engine.
    stdin: ChildStdin,
    /// Reader for receiving responses from the engine.
    stdout: BufReader<ChildStdout>,
    /// The engine's name (reported via UCI id).
    name: String,
}

impl UciEngine {
    /// Spawns the engine, performs the UCI handshake and applies `options`.
    ///
    /// # Errors
    ///
    /// - `OracleError::NotFound` if the engine executable doesn't exist
    /// - `OracleError::Io` if the engine process fails to start
    /// - `OracleError::HandshakeFailed` if UCI initialization fails
    pub fn new(engine_path: &str, options: &EngineOptions) -> Result<Self, OracleError> {
        // Bare names are resolved through PATH by the OS.
        let path = Path::new(engine_path);
        if path.components().count() > 1 && !path.exists() {
            return Err(OracleError::NotFound(engine_path.to_string()));
        }

        let mut process = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OracleError::NotFound(engine_path.to_string()),
                _ => OracleError::Io(e),
            })?;

        let stdin = process.stdin.take().ok_or(OracleError::HandshakeFailed)?;
        let stdout = process.stdout.take().ok_or(OracleError::HandshakeFailed)?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
        };
        engine.init_uci()?;
        engine.send_command(&format!("setoption name Threads value {}", options.threads))?;
        engine.send_command(&format!("setoption name Hash value {}", options.hash_mb))?;
        engine.wait_ready()?;

        debug!(engine = %engine.name, path = engine_path, "engine ready");
        Ok(engine)
    }

    fn init_uci(&mut self) -> Result<(), OracleError> {
        self.send_command("uci")?;

        let mut name = String::new();
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            if let Some(id) = line.strip_prefix("id name ") {
                name = id.to_string();
            } else if line == "uciok" {
                self.name = if name.is_empty() {
                    "Unknown Engine".to_string()
                } else {
                    name
                };
                return self.wait_ready();
            }
        }
        Err(OracleError::HandshakeFailed)
    }

    fn wait_ready(&mut self) -> Result<(), OracleError> {
        self.send_command("isready")?;
        for _ in 0..MAX_UCI_LINES {
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
        Err(OracleError::HandshakeFailed)
    }

    /// Returns the engine's name as reported via UCI protocol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs a search and returns the last exact score before `bestmove`.
    fn search(&mut self, limit: SearchLimit) -> Result<UciScore, OracleError> {
        self.send_command(&format!("go {}", limit))?;

        let mut score = None;
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            if line.starts_with("info ") {
                if let Some(parsed) = parse_info_score(&line) {
                    score = Some(parsed);
                }
            } else if line.starts_with("bestmove") {
                return score.ok_or_else(|| {
                    OracleError::InvalidResponse("no score before bestmove".to_string())
                });
            }
        }
        Err(OracleError::InvalidResponse(
            "Too many lines without bestmove".to_string(),
        ))
    }

    fn send_command(&mut self, command: &str) -> Result<(), OracleError> {
        trace!(command, "uci >");
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, OracleError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(OracleError::Closed);
        }
        Ok(line.trim().to_string())
    }
}

impl Oracle for UciEngine {
    fn evaluate(&mut self, fen: &str, limit: SearchLimit) -> Result<Evaluation, OracleError> {
        let limit = limit.validate()?;
        let side_to_move = match fen.split_whitespace().nth(1) {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            _ => return Err(OracleError::InvalidResponse(format!("bad FEN: {}", fen))),
        };
        self.send_command(&format!("position fen {}", fen))?;
        let score = self.search(limit)?;
        Ok(score.normalize(side_to_move))
    }

    fn new_game(&mut self) -> Result<(), OracleError> {
        self.send_command("ucinewgame")?;
        self.wait_ready()
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        let _ = self.process.wait();
    }
}

/// Extracts the score from a UCI `info` line.
///
/// Lines without a score, and bound-only scores (`upperbound`/`lowerbound`),
/// yield `None`.
pub fn parse_info_score(line: &str) -> Option<UciScore> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.iter().any(|p| *p == "upperbound" || *p == "lowerbound") {
        return None;
    }
    let at = parts.iter().position(|p| *p == "score")?;
    let value = parts.get(at + 2)?.parse().ok()?;
    match *parts.get(at + 1)? {
        "cp" => Some(UciScore::Cp(value)),
        "mate" => Some(UciScore::Mate(value)),
        _ => None,
    }
}

/// Opens a fresh engine process per session.
#[derive(Debug, Clone)]
pub struct UciEngineProvider {
    path: String,
    options: EngineOptions,
}

impl UciEngineProvider {
    pub fn new(path: impl Into<String>, options: EngineOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl OracleProvider for UciEngineProvider {
    type Session = UciEngine;

    fn open_session(&self) -> Result<UciEngine, OracleError> {
        UciEngine::new(&self.path, &self.options)
    }
}
