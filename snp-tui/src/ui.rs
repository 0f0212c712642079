// TUI rendering: spike raster (time on X, neurons on Y), per-neuron state panel,
// output spike trains and a status line.

use std::io::Stdout;

use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::App;
use crate::backend::SnpBackend;

fn train_line(neuron: &str, train: &[bool]) -> String {
    let bits: String = train.iter().map(|&b| if b { '1' } else { '0' }).collect();
    format!("{:<6} {}", neuron, bits)
}

/// Draws the UI each frame:
/// - Top left: raster rows (neurons) x columns (time, circular).
/// - Top right: configuration and delay status per neuron.
/// - Middle: output spike trains.
/// - Bottom: time, halted flag and controls.
pub fn draw<B: SnpBackend>(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App<B>) -> anyhow::Result<()> {
    terminal.draw(|f| {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Percentage(65),
                    Constraint::Percentage(20),
                    Constraint::Percentage(15),
                ]
                .as_ref(),
            )
            .split(f.size());
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
            .split(rows[0]);

        let mut lines = Vec::with_capacity(app.raster.len());
        for (i, row) in app.raster.iter().enumerate() {
            let mut buf = format!("{:<6}|", app.backend.label(i));
            buf.extend(row.iter());
            lines.push(buf);
        }
        let raster_widget = Paragraph::new(Text::from(lines.join("\n")))
            .block(Block::default().title("Spike Raster  (time →)").borders(Borders::ALL))
            .style(Style::default().fg(Color::White));
        f.render_widget(raster_widget, top[0]);

        let state_widget = Paragraph::new(Text::from(app.lines.join("\n")))
            .block(Block::default().title("Configuration").borders(Borders::ALL))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(state_widget, top[1]);

        let trains: Vec<String> = app
            .backend
            .output_trains()
            .iter()
            .map(|(neuron, train)| train_line(&app.backend.label(*neuron), train))
            .collect();
        let trains_widget = Paragraph::new(Text::from(trains.join("\n")))
            .block(Block::default().title("Output spike trains").borders(Borders::ALL))
            .style(Style::default().fg(Color::Green));
        f.render_widget(trains_widget, rows[1]);

        let mut status = format!(
            "Time: {} | Neurons: {} | Halted: {} | Running: {} | Redrawn: {}",
            app.backend.time(),
            app.backend.neurons(),
            if app.backend.halted() { "yes" } else { "no" },
            if app.running { "yes" } else { "no" },
            app.redrawn,
        );
        if let Some(msg) = &app.message {
            status.push_str(" | ");
            status.push_str(msg);
        }
        status.push_str("\n[s] Step  [b] Back  [x] Reset  [r] Run/Pause  [q] Quit");
        let status_widget = Paragraph::new(status)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status_widget, rows[2]);
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::train_line;

    #[test]
    fn trains_render_as_bits() {
        assert_eq!(train_line("out", &[true, false, true]), "out    101");
    }
}
