//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem, Wrap},
    style::{Color, Style, Modifier},
};
use crate::Flags;
use crate::cpu::memory::{MEMORY_SIZE, VECTOR_TABLE};
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(frame.area());

    // Left side: code, registers and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_disassembly(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: memory, console output and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(4),
        ])
        .split(chunks[1]);

    draw_memory(frame, right_chunks[0], app);
    draw_output(frame, right_chunks[1], app);
    draw_help(frame, right_chunks[2]);
}

/// Draw disassembly view around PC.
fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:02X}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Disassembly ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw register state.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let cpu = &app.cpu;
    let regs = cpu.regs.as_array();

    let reg_spans = |range: std::ops::Range<usize>, names: &[&str]| -> Line<'static> {
        let mut spans = Vec::new();
        for (i, name) in range.zip(names) {
            spans.push(Span::raw(format!("{}: ", name)));
            spans.push(Span::styled(format!("{:02X}  ", regs[i]), Style::default().fg(Color::White)));
        }
        Line::from(spans)
    };

    let content = vec![
        reg_spans(0..4, &["R0", "R1", "R2", "R3"]),
        reg_spans(4..8, &["R4", "IM", "IS", "SP"]),
        Line::from(vec![
            Span::raw("PC: "),
            Span::styled(format!("{:02X}", cpu.pc), Style::default().fg(Color::Yellow)),
            Span::raw("   FL: "),
            Span::styled(flag_text(cpu.fl), Style::default().fg(Color::Cyan)),
            Span::raw("   IE: "),
            Span::styled(
                if cpu.ie { "on" } else { "off" },
                if cpu.ie { Style::default().fg(Color::Green) } else { Style::default().fg(Color::Red) },
            ),
        ]),
        Line::from(vec![
            Span::raw("Last: "),
            Span::styled(
                cpu.last_instruction().map_or_else(|| "-".to_string(), |i| i.to_string()),
                Style::default().fg(Color::White),
            ),
            Span::raw("   Cycles: "),
            Span::styled(format!("{}", cpu.cycles), Style::default().fg(Color::Cyan)),
            Span::raw("   State: "),
            Span::styled(format!("{:?}", cpu.state),
                if cpu.is_running() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw memory as 16-byte hex rows.
fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll;
    let end = (start + visible_rows).min(MEMORY_SIZE / 16);
    let pc = app.cpu.pc as usize;
    let sp = app.cpu.regs.sp() as usize;

    let items: Vec<ListItem> = (start..end)
        .map(|row| {
            let base = row * 16;
            let mut spans = vec![Span::styled(format!("{:02X}: ", base), Style::default().fg(Color::DarkGray))];
            for (addr, value) in app.cpu.mem.dump(base, 16) {
                let style = if addr == pc {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if addr == sp {
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
                } else if addr >= VECTOR_TABLE as usize {
                    Style::default().fg(Color::Cyan)
                } else if value != 0 {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                spans.push(Span::styled(format!("{:02X} ", value), style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw captured console output, most recent lines last.
fn draw_output(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let text = String::from_utf8_lossy(&app.output);
    let rows = (area.height as usize).saturating_sub(2);
    let lines: Vec<&str> = text.lines().collect();
    let shown = lines[lines.len().saturating_sub(rows)..].join("\n");

    let output = Paragraph::new(shown)
        .wrap(Wrap { trim: false })
        .block(Block::default()
            .title(" Output ")
            .borders(Borders::ALL));

    frame.render_widget(output, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let title = if app.input_mode { " Status [INPUT] " } else { " Status " };
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint  x: Reset"),
        Line::from("i: Input mode (Esc leaves)  ↑↓: Scroll memory  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Short text for the comparison flags.
fn flag_text(fl: Flags) -> String {
    let mut text = String::new();
    text.push(if fl.contains(Flags::LT) { 'L' } else { '-' });
    text.push(if fl.contains(Flags::GT) { 'G' } else { '-' });
    text.push(if fl.contains(Flags::EQ) { 'E' } else { '-' });
    text
}
