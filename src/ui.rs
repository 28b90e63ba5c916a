//! Layout and drawing: playfield, falling piece, next preview, score, score board, pause and game over.

use crate::catalog::{CellColor, PieceKind};
use crate::game::GameState;
use crate::leaderboard::ScoreBoard;
use crate::playfield::{HEIGHT, WIDTH};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;
/// Rows of the score board shown in the sidebar.
const BOARD_ROWS: usize = 10;

const BORDER: Color = Color::DarkGray;
const TITLE: Color = Color::LightMagenta;
const TEXT: Color = Color::White;
const GRID: Color = Color::Rgb(60, 40, 48);

/// Playfield size in terminal cells, border included.
const fn playfield_size() -> (u16, u16) {
    (WIDTH as u16 * CELL_WIDTH + 2, HEIGHT as u16 + 2)
}

pub const fn cell_color(color: CellColor) -> Color {
    match color {
        CellColor::Red => Color::Red,
        CellColor::Cyan => Color::Cyan,
        CellColor::Gray => Color::Gray,
        CellColor::Yellow => Color::Yellow,
        CellColor::Magenta => Color::Magenta,
        CellColor::Blue => Color::Blue,
        CellColor::DarkGreen => Color::Green,
    }
}

/// Draw one frame from a read-only view of the game and the latest score board.
/// `offline` is set when no score service is configured at all.
pub fn draw(frame: &mut Frame, state: &GameState, scores: &ScoreBoard, user: &str, offline: bool) {
    let area = frame.area();
    let (pw, ph) = playfield_size();
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let buf = frame.buffer_mut();
    draw_playfield(buf, state, inner[0]);
    draw_sidebar(buf, state, scores, user, offline, inner[1]);

    if state.is_game_over() {
        draw_game_over(buf, state, inner[0]);
    } else if state.is_paused() {
        draw_pause_overlay(buf, inner[0]);
    }
}

fn draw_block(buf: &mut Buffer, area: Rect, x: i32, y: i32, color: Color) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    let rx = area.x + x * CELL_WIDTH;
    let ry = area.y + y;
    if rx + CELL_WIDTH <= area.x + area.width && ry < area.y + area.height {
        buf.set_string(rx, ry, "██", Style::default().fg(color));
    }
}

fn draw_playfield(buf: &mut Buffer, state: &GameState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Tetrix ", Style::default().fg(TITLE)));
    let board = block.inner(area);
    block.render(area, buf);

    for (y, row) in state.playfield().rows().enumerate() {
        for (x, slot) in row.iter().enumerate() {
            let (x, y) = (x as i32, y as i32);
            match slot {
                Some(color) => draw_block(buf, board, x, y, cell_color(*color)),
                None => {
                    let rx = board.x + x as u16 * CELL_WIDTH;
                    let ry = board.y + y as u16;
                    if rx + CELL_WIDTH <= board.x + board.width && ry < board.y + board.height {
                        buf.set_string(rx, ry, "· ", Style::default().fg(GRID));
                    }
                }
            }
        }
    }

    for cell in state.piece().cells {
        draw_block(buf, board, cell.x, cell.y, cell_color(cell.color));
    }
}

fn section(buf: &mut Buffer, area: Rect, title: &str) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(format!(" {title} "), Style::default().fg(TITLE)));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

fn draw_sidebar(
    buf: &mut Buffer,
    state: &GameState,
    scores: &ScoreBoard,
    user: &str,
    offline: bool,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next
            Constraint::Length(6), // Score, best, level, lines
            Constraint::Fill(1),   // Score board
        ])
        .split(area);

    let next_inner = section(buf, chunks[0], "Next");
    draw_next_preview(buf, state.next_kind(), next_inner);

    let stats_inner = section(buf, chunks[1], "Score");
    let label = Style::default().fg(TITLE);
    let value = Style::default().fg(TEXT);
    let stats = vec![
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Best: ", label),
            Span::styled(
                scores.get(user).map_or_else(|| "-".to_string(), |s| s.to_string()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Level: ", label),
            Span::styled(state.level().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Lines: ", label),
            Span::styled(state.lines_cleared().to_string(), value),
        ]),
    ];
    Paragraph::new(stats).render(stats_inner, buf);

    let board_inner = section(buf, chunks[2], "High Scores");
    let lines: Vec<Line> = if scores.is_empty() {
        // Online but nothing fetched yet, or the server has no scores.
        let note = if offline { "(offline)" } else { "(no scores yet)" };
        vec![Line::from(Span::styled(note, Style::default().fg(BORDER)))]
    } else {
        scores
            .ranking()
            .into_iter()
            .take(BOARD_ROWS)
            .map(|(name, score)| {
                let mut style = value;
                if name == user {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let width = usize::from(board_inner.width);
                let score = score.to_string();
                let name_width = width.saturating_sub(score.len() + 1);
                let name: String = name.chars().take(name_width).collect();
                Line::from(vec![
                    Span::styled(format!("{name:<name_width$} "), style),
                    Span::styled(score, Style::default().fg(Color::Red)),
                ])
            })
            .collect()
    };
    Paragraph::new(lines).render(board_inner, buf);
}

/// Next piece drawn with its top-left cell at the preview's origin.
fn draw_next_preview(buf: &mut Buffer, kind: PieceKind, area: Rect) {
    let layout = kind.spawn_layout();
    let min_x = layout.iter().map(|(x, _)| *x).min().unwrap_or(0);
    let min_y = layout.iter().map(|(_, y)| *y).min().unwrap_or(0);
    let color = cell_color(kind.color());
    let origin = Rect {
        x: area.x + 1,
        ..area
    };
    for (x, y) in layout {
        draw_block(buf, origin, x - min_x, y - min_y, color);
    }
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(buf: &mut Buffer, area: Rect) {
    let rect = popup(area, 18, 5);
    Clear.render(rect, buf);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Green),
        )),
        Line::from(Span::styled("P to resume", Style::default().fg(TEXT))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .render(rect, buf);
}

fn draw_game_over(buf: &mut Buffer, state: &GameState, area: Rect) {
    let rect = popup(area, 20, 7);
    Clear.render(rect, buf);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " GAME OVER ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Score: {}", state.score()),
            Style::default().fg(TEXT),
        )),
        Line::from(""),
        Line::from(Span::styled("Enter restart", Style::default().fg(TEXT))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .render(rect, buf);
}
