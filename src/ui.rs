//! Terminal UI rendering with ratatui

use crate::board::{Cell, GRID_HEIGHT, GRID_WIDTH};
use crate::duel::{Duel, MAX_PLAYERS};
use crate::game::{Game, Phase};
use crate::settings::Settings;
use crate::tetromino::FOOTPRINT_SIZE;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Per-player colors: panel outline, settled stack, and live piece.
struct Palette {
    outline: Color,
    full: Color,
    moving: Color,
}

/// One palette per player, blues against purples.
const PLAYER_PALETTES: [Palette; MAX_PLAYERS] = [
    Palette {
        outline: Color::Rgb(102, 191, 255),
        full: Color::Rgb(0, 121, 241),
        moving: Color::Rgb(0, 82, 172),
    },
    Palette {
        outline: Color::Rgb(200, 122, 255),
        full: Color::Rgb(135, 60, 190),
        moving: Color::Rgb(112, 31, 126),
    },
];

/// Colors a fading row alternates between.
const FADE_ACCENT: Color = Color::Rgb(190, 33, 55);
const FADE_BASE: Color = Color::Rgb(130, 130, 130);

const WALL_COLOR: Color = Color::Rgb(200, 200, 200);

/// Render the whole duel: both boards side by side plus the pause banner.
pub fn render(frame: &mut Frame, duel: &Duel, settings: &Settings) {
    let area = frame.area();
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (index, game) in duel.games().iter().enumerate() {
        render_player(frame, halves[index], game, index, settings);
    }

    if duel.is_paused() {
        render_banner(frame, area, "GAME PAUSED");
    }
}

/// One player's half: the board with a side panel next to it.
fn render_player(frame: &mut Frame, area: Rect, game: &Game, index: usize, settings: &Settings) {
    let palette = &PLAYER_PALETTES[index];

    let block = Block::default()
        .title(format!(" PLAYER {} ", index + 1))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.outline));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(GRID_WIDTH as u16 * 2), // board, two characters per cell
            Constraint::Min(14),                       // preview and stats
        ])
        .split(inner);

    if game.phase() == Phase::GameOver {
        render_game_over(frame, columns[0], palette);
    } else {
        render_board(frame, columns[0], game, palette, settings);
    }
    render_side_panel(frame, columns[1], game, palette, settings);
}

/// The full grid, walls included.
fn render_board(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    palette: &Palette,
    settings: &Settings,
) {
    let (block_char, empty_char) = settings.visual.block_chars();
    let board = game.board();

    let mut lines: Vec<Line> = Vec::new();
    for y in 0..GRID_HEIGHT as i32 {
        let mut spans = Vec::new();
        for x in 0..GRID_WIDTH as i32 {
            let span = match board.cell(x, y) {
                Cell::Empty => {
                    Span::styled(empty_char, Style::default().fg(palette.outline).dim())
                }
                Cell::Moving => Span::styled(block_char, Style::default().fg(palette.moving)),
                Cell::Full => Span::styled(block_char, Style::default().fg(palette.full)),
                Cell::Wall => Span::styled(block_char, Style::default().fg(WALL_COLOR)),
                Cell::Fading => {
                    let color = if game.fade_flash_on() {
                        FADE_ACCENT
                    } else {
                        FADE_BASE
                    };
                    Span::styled(block_char, Style::default().fg(color))
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Restart prompt shown where the board was.
fn render_game_over(frame: &mut Frame, area: Rect, palette: &Palette) {
    let text_area = center_rect(area, area.width, 2);
    let lines = vec![
        Line::styled("PRESS [ENTER]", Style::default().fg(palette.outline).bold()),
        Line::styled("TO PLAY AGAIN", Style::default().fg(palette.outline).bold()),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        text_area,
    );
}

/// Incoming piece preview and the line statistics.
fn render_side_panel(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    palette: &Palette,
    settings: &Settings,
) {
    let (block_char, empty_char) = settings.visual.block_chars();

    let mut lines = vec![
        Line::raw(""),
        Line::styled("INCOMING:", Style::default().fg(palette.outline)),
    ];
    for y in 0..FOOTPRINT_SIZE {
        let mut spans = vec![Span::raw(" ")];
        for x in 0..FOOTPRINT_SIZE {
            let occupied = game
                .preview()
                .is_some_and(|footprint| footprint.is_set(x, y));
            if occupied {
                spans.push(Span::styled(block_char, Style::default().fg(palette.full)));
            } else {
                spans.push(Span::styled(
                    empty_char,
                    Style::default().fg(palette.outline).dim(),
                ));
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!("LINES: {:04}", game.lines()),
        Style::default().fg(palette.outline).bold(),
    ));
    lines.push(Line::styled(
        format!("LEVEL: {}", game.level()),
        Style::default().fg(palette.outline),
    ));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Centered banner drawn over everything else.
fn render_banner(frame: &mut Frame, area: Rect, text: &str) {
    let popup = center_rect(area, text.len() as u16 + 6, 3);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let line = Line::styled(text, Style::default().fg(Color::Yellow).bold());
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
