//! Bitcoin Tap rendering: coin panel, upgrades, achievements, toasts and the
//! reset dialog.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{centered_rect, ClickableList};

use super::actions::*;
use super::display::{Projection, TapPoint};
use super::hud::{combo_label, tap_label, Hud, Spark, NOTICE_MS};
use super::logic::format_btc;

/// Coin art, 5 lines x 11 cols.
const COIN_ART: &[&str] = &[
    "  ╭─────╮  ",
    " ╱ ╭───╮ ╲ ",
    "│  │ ₿ │  │",
    " ╲ ╰───╯ ╱ ",
    "  ╰─────╯  ",
];

/// Squashed coin while a tap flash is running.
const COIN_PRESSED_ART: &[&str] = &[
    "           ",
    "  ╭─────╮  ",
    " │ ╭ ₿ ╮ │ ",
    "  ╰─────╯  ",
    "           ",
];

/// Lines above the coin art inside the coin panel.
const COIN_ART_TOP: u16 = 3;

const BITCOIN_ORANGE: Color = Color::Rgb(247, 147, 26);

pub fn render(
    hud: &Hud,
    confirm_reset: bool,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let Some(p) = hud.projection.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading...").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(p, f, chunks[0]);
    if is_narrow_layout(area.width) {
        render_narrow(hud, p, f, chunks[1], click_state);
    } else {
        render_wide(hud, p, f, chunks[1], click_state);
    }
    render_footer(f, chunks[2], click_state);

    render_sparks(hud, f, chunks[1]);
    render_notices(hud, f, chunks[1]);
    if confirm_reset {
        render_reset_dialog(f, area, click_state);
    }
}

/// Wide layout: coin panel | upgrades over achievements.
fn render_wide(
    hud: &Hud,
    p: &Projection,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(upgrades_height(p)),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    render_coin_panel(hud, p, f, columns[0], click_state);
    render_upgrades(p, f, right[0], click_state);
    render_achievements(p, f, right[1]);
}

/// Narrow layout: everything stacked.
fn render_narrow(
    hud: &Hud,
    p: &Projection,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(upgrades_height(p)),
            Constraint::Min(3),
        ])
        .split(area);

    render_coin_panel(hud, p, f, chunks[0], click_state);
    render_upgrades(p, f, chunks[1], click_state);
    render_achievements(p, f, chunks[2]);
}

fn upgrades_height(p: &Projection) -> u16 {
    // Two lines per upgrade plus borders.
    p.upgrades.len() as u16 * 2 + 2
}

fn render_header(p: &Projection, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "₿ Bitcoin Tap   ",
            Style::default().fg(BITCOIN_ORANGE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} BTC", format_btc(p.balance)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);
    let widget = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_coin_panel(
    hud: &Hud,
    p: &Projection,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let flashing = hud.tap_flash_ms > 0.0;
    let dim = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled("per tap ", dim),
        Span::styled(format_btc(p.per_tap), value),
        Span::styled("  x", dim),
        Span::styled(p.multiplier.to_string(), value),
    ]));
    cl.push(Line::from(vec![
        Span::styled("per sec ", dim),
        Span::styled(format_btc(p.per_second), value),
    ]));
    cl.push(Line::from(""));

    let (art, coin_color) = if flashing {
        (COIN_PRESSED_ART, Color::White)
    } else {
        (COIN_ART, BITCOIN_ORANGE)
    };
    let coin_style = Style::default().fg(coin_color).add_modifier(Modifier::BOLD);
    for row in art {
        cl.push_clickable(Line::from(Span::styled(*row, coin_style)), TAP_COIN);
    }

    let tap_line = match hud.last_tap {
        Some(v) if flashing => Line::from(Span::styled(
            tap_label(v),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(Span::styled(
            "[Space] TAP!",
            Style::default().fg(Color::Yellow),
        )),
    };
    cl.push_clickable(tap_line, TAP_COIN);

    match hud.combo {
        Some((streak, pct)) => cl.push(Line::from(Span::styled(
            combo_label(streak, pct),
            Style::default().fg(BITCOIN_ORANGE).add_modifier(Modifier::BOLD),
        ))),
        None => cl.push(Line::from("")),
    }

    let border_color = if flashing || hud.combo.is_some() {
        BITCOIN_ORANGE
    } else {
        Color::Yellow
    };
    let borders = if area.width >= 30 {
        Borders::ALL
    } else {
        Borders::TOP | Borders::BOTTOM
    };

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);
    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(borders)
                .border_style(Style::default().fg(border_color))
                .title(" Mine "),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

/// Center of the coin art within a coin panel drawn at `area`.
fn coin_center(area: Rect) -> TapPoint {
    TapPoint {
        col: area.x + area.width / 2,
        row: area.y + 1 + COIN_ART_TOP + COIN_ART.len() as u16 / 2,
    }
}

fn render_upgrades(
    p: &Projection,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for view in &p.upgrades {
        let action = BUY_UPGRADE_BASE + view.kind.index() as u16;
        let (key_style, text_style) = if view.affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        let cost_style = if view.affordable {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", view.kind.key()), key_style),
                Span::styled(view.kind.name(), text_style.add_modifier(Modifier::BOLD)),
                Span::styled(format!("  Lv {}", view.level), text_style),
                Span::styled(format!("  {} BTC", format_btc(view.cost)), cost_style),
            ]),
            action,
        );
        cl.push_clickable(
            Line::from(Span::styled(
                format!("     {}", view.kind.description()),
                Style::default().fg(Color::DarkGray),
            )),
            action,
        );
    }

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Upgrades "),
    );
    f.render_widget(widget, area);
}

fn render_achievements(p: &Projection, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = p
        .achievements
        .iter()
        .map(|a| {
            if a.unlocked {
                Line::from(vec![
                    Span::raw(format!(" {} ", a.id.medal())),
                    Span::styled(
                        a.id.name(),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" ✔", Style::default().fg(Color::Green)),
                ])
            } else {
                Line::from(Span::styled(
                    format!(" 🔒 {}  at {} BTC", a.id.name(), format_btc(a.threshold)),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Achievements "),
    );
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::Gray);
    let buttons = [
        ("[S]", " Save game", SAVE_GAME),
        ("[R]", " Reset", RESET_GAME),
    ];

    let mut cs = click_state.borrow_mut();
    for ((k, text, action), half) in buttons.into_iter().zip(halves.iter()) {
        let widget = Paragraph::new(Line::from(vec![
            Span::styled(k, key),
            Span::styled(text, label),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(widget, *half);
        // Full footer height for easier taps.
        cs.add_click_target(Rect::new(half.x, area.y, half.width, area.height), action);
    }
}

/// Screen cell a spark currently occupies, if it is inside `bounds`.
fn spark_cell(spark: &Spark, fallback: TapPoint, bounds: Rect) -> Option<(u16, u16)> {
    let origin = spark.origin.unwrap_or(fallback);
    let (dx, dy) = spark.offset();
    let x = origin.col as i32 + dx;
    let y = origin.row as i32 + dy;
    let inside = x >= bounds.x as i32
        && x < (bounds.x + bounds.width) as i32
        && y >= bounds.y as i32
        && y < (bounds.y + bounds.height) as i32;
    inside.then(|| (x as u16, y as u16))
}

fn render_sparks(hud: &Hud, f: &mut Frame, body: Rect) {
    // The coin panel always sits at the top-left of the body.
    let coin_area = if is_narrow_layout(body.width) {
        Rect::new(body.x, body.y, body.width, 12.min(body.height))
    } else {
        Rect::new(body.x, body.y, body.width * 45 / 100, body.height)
    };
    let fallback = coin_center(coin_area);

    for spark in &hud.sparks {
        let Some((x, y)) = spark_cell(spark, fallback, body) else {
            continue;
        };
        let progress = spark.progress();
        let color = if progress > 0.75 {
            Color::DarkGray
        } else if spark.gold {
            Color::Yellow
        } else {
            BITCOIN_ORANGE
        };
        let glyph = if progress < 0.5 { "✦" } else { "·" };
        let widget = Paragraph::new(Span::styled(
            glyph,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(widget, Rect::new(x, y, 1, 1));
    }
}

/// Toast box for `lines` of text, top-centered in `body`.
fn toast_rect(lines: &[Line], body: Rect) -> Rect {
    let text_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let w = (text_width + 4).min(body.width);
    let h = (lines.len() as u16 + 2).min(body.height);
    Rect::new(body.x + (body.width - w) / 2, body.y + (body.height - h).min(1), w, h)
}

fn render_notices(hud: &Hud, f: &mut Frame, body: Rect) {
    if hud.notices.is_empty() {
        return;
    }
    let lines: Vec<Line> = hud
        .notices
        .iter()
        .map(|n| {
            let style = if n.age_ms > NOTICE_MS * 0.75 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(n.text.as_str(), style))
        })
        .collect();

    let rect = toast_rect(&lines, body);
    f.render_widget(Clear, rect);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, rect);
}

fn render_reset_dialog(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let rect = centered_rect(44, 8, area);

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "Reset all progress?",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from("Balance, upgrades and achievements"));
    cl.push(Line::from("will be lost."));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "[Y] Yes, reset",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        CONFIRM_RESET,
    );
    cl.push_clickable(
        Line::from(Span::styled("[N] Cancel", Style::default().fg(Color::Gray))),
        CANCEL_RESET,
    );

    {
        let mut cs = click_state.borrow_mut();
        // Backdrop first so the dialog rows win hit tests.
        cs.add_click_target(area, DIALOG_BACKDROP);
        cl.register_targets(rect, &mut cs, 1, 1);
    }

    f.render_widget(Clear, rect);
    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Reset "),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, rect);
}
