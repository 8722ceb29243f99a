//! PGN (Portable Game Notation) game records.
//!
//! Reads tag pairs and SAN movetext, attaching `[%clk H:MM:SS]` comment
//! annotations to the half-move they follow. Every move is replayed on the
//! board while reading, so a [`GameRecord`] always holds a legal game in
//! canonical SAN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::san::{move_to_san, san_to_move, SanError};
use crate::{Color, Position};

/// Errors that can occur when reading a PGN game record.
#[derive(Debug, Error, PartialEq)]
pub enum PgnError {
    /// The input contains no tags and no moves.
    #[error("no game found")]
    Empty,
    /// A tag pair line could not be parsed.
    #[error("malformed tag pair: {0}")]
    MalformedTag(String),
    /// A `{` comment was never closed.
    #[error("unterminated comment")]
    UnterminatedComment,
    /// Parentheses around variations do not balance.
    #[error("unbalanced variation")]
    UnbalancedVariation,
    /// The game starts from a `FEN`/`SetUp` position instead of the standard one.
    #[error("custom start positions are not supported")]
    CustomStartPosition,
    /// A move could not be played in the position it was recorded from.
    #[error("illegal move '{san}' at ply {ply}: {source}")]
    IllegalMove {
        ply: usize,
        san: String,
        #[source]
        source: SanError,
    },
}

/// Outcome recorded in the `Result` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[serde(rename = "*")]
    Unfinished,
}

impl GameOutcome {
    /// Parses a PGN result token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1-0" => Some(GameOutcome::WhiteWins),
            "0-1" => Some(GameOutcome::BlackWins),
            "1/2-1/2" => Some(GameOutcome::Draw),
            "*" => Some(GameOutcome::Unfinished),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameOutcome::WhiteWins => "1-0",
            GameOutcome::BlackWins => "0-1",
            GameOutcome::Draw => "1/2-1/2",
            GameOutcome::Unfinished => "*",
        }
    }

    /// The winning color, if the game was decisive.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::WhiteWins => Some(Color::White),
            GameOutcome::BlackWins => Some(Color::Black),
            GameOutcome::Draw | GameOutcome::Unfinished => None,
        }
    }
}

/// Header-level information about a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHeaders {
    pub white: String,
    pub black: String,
    /// Date as written in the `Date` tag (`YYYY.MM.DD`).
    pub date: Option<String>,
    pub result: GameOutcome,
    pub white_elo: Option<u32>,
    pub black_elo: Option<u32>,
    /// Raw `TimeControl` tag, e.g. `"300+3"`.
    pub time_control: Option<String>,
    pub event: Option<String>,
    pub site: Option<String>,
    /// Any other tags, preserved verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

impl Default for GameHeaders {
    fn default() -> Self {
        Self {
            white: "?".to_string(),
            black: "?".to_string(),
            date: None,
            result: GameOutcome::Unfinished,
            white_elo: None,
            black_elo: None,
            time_control: None,
            event: None,
            site: None,
            other: BTreeMap::new(),
        }
    }
}

impl GameHeaders {
    fn from_tags(tags: Vec<(String, String)>) -> Result<Self, PgnError> {
        let mut headers = GameHeaders::default();
        let mut result_tag = None;
        for (key, value) in tags {
            match key.as_str() {
                "White" => headers.white = value,
                "Black" => headers.black = value,
                "Date" => headers.date = Some(value),
                "Result" => result_tag = GameOutcome::parse(&value),
                "WhiteElo" => headers.white_elo = value.parse().ok(),
                "BlackElo" => headers.black_elo = value.parse().ok(),
                "TimeControl" => headers.time_control = Some(value),
                "Event" => headers.event = Some(value),
                "Site" => headers.site = Some(value),
                "FEN" => return Err(PgnError::CustomStartPosition),
                "SetUp" if value == "1" => return Err(PgnError::CustomStartPosition),
                _ => {
                    headers.other.insert(key, value);
                }
            }
        }
        if let Some(result) = result_tag {
            headers.result = result;
        }
        Ok(headers)
    }

    /// Human-readable label for the time control tag.
    pub fn time_control_label(&self) -> Option<String> {
        self.time_control.as_deref().and_then(time_control_label)
    }
}

/// One half-move as recorded in the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedMove {
    /// Move in SAN.
    pub san: String,
    /// Clock time remaining for the mover after this move, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<f64>,
}

impl RecordedMove {
    pub fn new(san: impl Into<String>, clock: Option<f64>) -> Self {
        Self {
            san: san.into(),
            clock,
        }
    }
}

/// One replayed half-move with the positions around it.
#[derive(Debug, Clone)]
pub struct Ply {
    /// Full-move number of the position before the move (shared by both colors).
    pub move_number: u32,
    pub mover: Color,
    pub san: String,
    pub clock: Option<f64>,
    pub before: Position,
    pub after: Position,
}

/// A complete game: headers plus the ordered half-move sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub headers: GameHeaders,
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    /// Builds a record from headers and moves, replaying every move to
    /// validate it and rewriting it in canonical SAN.
    pub fn new(headers: GameHeaders, moves: Vec<RecordedMove>) -> Result<Self, PgnError> {
        let mut position = Position::startpos();
        let mut canonical = Vec::with_capacity(moves.len());
        for (ply, recorded) in moves.into_iter().enumerate() {
            let mv = san_to_move(&position, &recorded.san).map_err(|source| {
                PgnError::IllegalMove {
                    ply: ply + 1,
                    san: recorded.san.clone(),
                    source,
                }
            })?;
            canonical.push(RecordedMove {
                san: move_to_san(&position, mv),
                clock: recorded.clock,
            });
            position = position.play(mv);
        }
        Ok(Self {
            headers,
            moves: canonical,
        })
    }

    /// Reads the first game of a PGN text.
    pub fn from_pgn(text: &str) -> Result<Self, PgnError> {
        split_games(text)
            .into_iter()
            .next()
            .ok_or(PgnError::Empty)
            .and_then(|chunk| parse_game(&chunk))
    }

    /// Reads every game of a PGN text, one result per game.
    pub fn parse_all(text: &str) -> Vec<Result<Self, PgnError>> {
        split_games(text)
            .iter()
            .map(|chunk| parse_game(chunk))
            .collect()
    }

    /// The color a named player had in this game.
    pub fn color_of(&self, player: &str) -> Option<Color> {
        if self.headers.white == player {
            Some(Color::White)
        } else if self.headers.black == player {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The rating recorded for one side.
    pub fn rating_of(&self, color: Color) -> Option<u32> {
        match color {
            Color::White => self.headers.white_elo,
            Color::Black => self.headers.black_elo,
        }
    }

    /// SAN of each half-move in order.
    pub fn san_moves(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(|m| m.san.as_str())
    }

    /// Replays the game from the starting position.
    pub fn plies(&self) -> Result<Vec<Ply>, PgnError> {
        let mut position = Position::startpos();
        let mut plies = Vec::with_capacity(self.moves.len());
        for (index, recorded) in self.moves.iter().enumerate() {
            let (_, after) = position
                .play_san(&recorded.san)
                .map_err(|source| PgnError::IllegalMove {
                    ply: index + 1,
                    san: recorded.san.clone(),
                    source,
                })?;
            plies.push(Ply {
                move_number: position.fullmove_number,
                mover: position.side_to_move,
                san: recorded.san.clone(),
                clock: recorded.clock,
                before: position,
                after: after.clone(),
            });
            position = after;
        }
        Ok(plies)
    }
}

/// Splits a PGN text into per-game chunks.
fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut in_movetext = false;
    let mut brace_depth: i32 = 0;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let is_tag = brace_depth == 0 && trimmed.starts_with('[') && !trimmed.starts_with("[%");
        if is_tag && in_movetext {
            games.push(std::mem::take(&mut current));
            in_movetext = false;
        }
        if !is_tag && !trimmed.is_empty() {
            in_movetext = true;
        }
        brace_depth += line.matches('{').count() as i32 - line.matches('}').count() as i32;
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        games.push(current);
    }
    games
}

fn parse_game(chunk: &str) -> Result<GameRecord, PgnError> {
    let mut tags = Vec::new();
    let mut movetext = String::new();
    let mut in_movetext = false;

    for line in chunk.lines() {
        let trimmed = line.trim();
        if !in_movetext && trimmed.starts_with('[') && !trimmed.starts_with("[%") {
            tags.push(parse_tag(trimmed)?);
        } else if !trimmed.is_empty() || in_movetext {
            in_movetext = true;
            movetext.push_str(line);
            movetext.push('\n');
        }
    }

    if tags.is_empty() && movetext.trim().is_empty() {
        return Err(PgnError::Empty);
    }

    let mut headers = GameHeaders::from_tags(tags)?;
    let (moves, terminator) = parse_movetext(&movetext)?;
    if let Some(result) = terminator {
        if headers.result == GameOutcome::Unfinished {
            headers.result = result;
        }
    }
    GameRecord::new(headers, moves)
}

fn parse_tag(line: &str) -> Result<(String, String), PgnError> {
    let malformed = || PgnError::MalformedTag(line.to_string());
    let inner = line
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (key, rest) = inner.trim().split_once(char::is_whitespace).ok_or_else(malformed)?;
    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((
        key.to_string(),
        value.replace("\\\"", "\"").replace("\\\\", "\\"),
    ))
}

/// Tokenizes movetext into main-line moves with clock annotations.
fn parse_movetext(text: &str) -> Result<(Vec<RecordedMove>, Option<GameOutcome>), PgnError> {
    let mut moves: Vec<RecordedMove> = Vec::new();
    let mut terminator = None;
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut comment = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => comment.push(ch),
                        None => return Err(PgnError::UnterminatedComment),
                    }
                }
                if depth == 0 {
                    if let (Some(last), Some(clock)) = (moves.last_mut(), parse_clock(&comment)) {
                        last.clock = Some(clock);
                    }
                }
            }
            ';' => {
                for ch in chars.by_ref() {
                    if ch == '\n' {
                        break;
                    }
                }
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or(PgnError::UnbalancedVariation)?;
            }
            c if c.is_whitespace() => {}
            _ => {
                let mut token = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || "{}();".contains(next) {
                        break;
                    }
                    token.push(next);
                    chars.next();
                }
                if depth > 0 || token.starts_with('$') {
                    continue;
                }
                if let Some(result) = GameOutcome::parse(&token) {
                    terminator = Some(result);
                    break;
                }
                let san = strip_move_number(&token);
                if !san.is_empty() {
                    moves.push(RecordedMove::new(san, None));
                }
            }
        }
    }

    if depth != 0 {
        return Err(PgnError::UnbalancedVariation);
    }
    Ok((moves, terminator))
}

/// Strips a leading move number such as `12.` or `12...` from a token.
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    }
}

/// Extracts the `[%clk H:MM:SS(.f)]` value from a comment, in seconds.
pub fn parse_clock(comment: &str) -> Option<f64> {
    let start = comment.find("[%clk")? + "[%clk".len();
    let rest = &comment[start..];
    let end = rest.find(']')?;
    let mut seconds = 0.0;
    for part in rest[..end].trim().split(':') {
        let value: f64 = part.parse().ok()?;
        seconds = seconds * 60.0 + value;
    }
    Some(seconds)
}

/// Formats a `TimeControl` tag: `"300+3"` → `"5+3"`, `"600"` → `"10 min"`,
/// `"-"` → `"Correspondence"`.
pub fn time_control_label(tc: &str) -> Option<String> {
    let tc = tc.trim();
    if tc == "-" {
        return Some("Correspondence".to_string());
    }
    let (base, increment) = match tc.split_once('+') {
        Some((base, inc)) => (base, inc.parse::<u32>().ok()?),
        None => (tc, 0),
    };
    let minutes = base.parse::<u32>().ok()? / 60;
    if increment > 0 {
        Some(format!("{}+{}", minutes, increment))
    } else {
        Some(format!("{} min", minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abc"]
[Date "2024.03.15"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[WhiteElo "1850"]
[BlackElo "1790"]
[TimeControl "300+3"]

1. e4 { [%clk 0:05:00] } 1... c5 { [%clk 0:04:58] } 2. Nf3 { [%clk 0:04:55.5] }
2... d6 (2... Nc6 3. d4) 3. d4 $1 cxd4 4. Nxd4 Nf6 5. Nc3 a6 1-0
"#;

    #[test]
    fn reads_headers() {
        let record = GameRecord::from_pgn(SAMPLE).unwrap();
        let h = &record.headers;
        assert_eq!(h.white, "alice");
        assert_eq!(h.black, "bob");
        assert_eq!(h.date.as_deref(), Some("2024.03.15"));
        assert_eq!(h.result, GameOutcome::WhiteWins);
        assert_eq!(h.white_elo, Some(1850));
        assert_eq!(h.black_elo, Some(1790));
        assert_eq!(h.time_control_label().as_deref(), Some("5+3"));
        assert_eq!(h.event.as_deref(), Some("Rated Blitz game"));
    }

    #[test]
    fn reads_main_line_and_clocks() {
        let record = GameRecord::from_pgn(SAMPLE).unwrap();
        let sans: Vec<&str> = record.san_moves().collect();
        assert_eq!(
            sans,
            vec!["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"]
        );
        assert_eq!(record.moves[0].clock, Some(300.0));
        assert_eq!(record.moves[1].clock, Some(298.0));
        assert_eq!(record.moves[2].clock, Some(295.5));
        assert_eq!(record.moves[3].clock, None);
    }

    #[test]
    fn plies_share_move_numbers() {
        let record = GameRecord::from_pgn(SAMPLE).unwrap();
        let plies = record.plies().unwrap();
        assert_eq!(plies.len(), 10);
        assert_eq!((plies[0].move_number, plies[0].mover), (1, Color::White));
        assert_eq!((plies[1].move_number, plies[1].mover), (1, Color::Black));
        assert_eq!((plies[2].move_number, plies[2].mover), (2, Color::White));
        assert_eq!(plies[0].before.to_fen(), Position::STARTPOS);
        assert_eq!(plies[0].after, plies[1].before);
    }

    #[test]
    fn canonicalizes_san() {
        let record = GameRecord::from_pgn("1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7 1-0").unwrap();
        assert_eq!(record.moves.last().map(|m| m.san.as_str()), Some("Qxf7#"));
        assert_eq!(record.headers.result, GameOutcome::WhiteWins);
    }

    #[test]
    fn rejects_illegal_moves() {
        let err = GameRecord::from_pgn("1. e4 e5 2. Ke2 Ke7 3. Kd5 *").unwrap_err();
        assert!(matches!(err, PgnError::IllegalMove { ply: 5, .. }));
    }

    #[test]
    fn rejects_custom_start_and_bad_comments() {
        let fen = "[SetUp \"1\"]\n[FEN \"8/8/8/8/8/8/8/K1k5 w - - 0 1\"]\n\n1. Kb1 *";
        assert_eq!(
            GameRecord::from_pgn(fen).unwrap_err(),
            PgnError::CustomStartPosition
        );
        assert_eq!(
            GameRecord::from_pgn("1. e4 { unterminated").unwrap_err(),
            PgnError::UnterminatedComment
        );
        assert_eq!(
            GameRecord::from_pgn("1. e4 (1. d4 e5").unwrap_err(),
            PgnError::UnbalancedVariation
        );
        assert_eq!(GameRecord::from_pgn("   \n").unwrap_err(), PgnError::Empty);
    }

    #[test]
    fn empty_game_is_valid() {
        let record = GameRecord::from_pgn("[White \"a\"]\n[Black \"b\"]\n\n*").unwrap();
        assert!(record.moves.is_empty());
        assert!(record.plies().unwrap().is_empty());
    }

    #[test]
    fn parses_multiple_games_independently() {
        let text = format!("{}\n{}\n[White \"x\"]\n\n1. e4 e4 *\n", SAMPLE, SAMPLE);
        let games = GameRecord::parse_all(&text);
        assert_eq!(games.len(), 3);
        assert!(games[0].is_ok());
        assert!(games[1].is_ok());
        assert!(games[2].is_err());
    }

    #[test]
    fn player_lookup() {
        let record = GameRecord::from_pgn(SAMPLE).unwrap();
        assert_eq!(record.color_of("alice"), Some(Color::White));
        assert_eq!(record.color_of("bob"), Some(Color::Black));
        assert_eq!(record.color_of("carol"), None);
        assert_eq!(record.rating_of(Color::Black), Some(1790));
    }

    #[test]
    fn clock_formats() {
        assert_eq!(parse_clock("[%clk 1:00:00]"), Some(3600.0));
        assert_eq!(parse_clock(" [%clk 0:00:09.8] [%eval 0.3]"), Some(9.8));
        assert_eq!(parse_clock("[%clk 2:05]"), Some(125.0));
        assert_eq!(parse_clock("no clock here"), None);
        assert_eq!(parse_clock("[%clk bad]"), None);
    }

    #[test]
    fn time_control_labels() {
        assert_eq!(time_control_label("-").as_deref(), Some("Correspondence"));
        assert_eq!(time_control_label("600").as_deref(), Some("10 min"));
        assert_eq!(time_control_label("180+2").as_deref(), Some("3+2"));
        assert_eq!(time_control_label("?"), None);
    }

    #[test]
    fn move_numbers_attached_to_moves() {
        assert_eq!(strip_move_number("12."), "");
        assert_eq!(strip_move_number("12...Nf6"), "Nf6");
        assert_eq!(strip_move_number("1.e4"), "e4");
        assert_eq!(strip_move_number("0-0"), "0-0");
    }
}
